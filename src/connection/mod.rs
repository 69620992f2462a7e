//! MongoDB connection management and operations.
//!
//! This module provides:
//! - `ConnectionManager`: runtime ownership, connecting and collection admin
//! - `ops`: documents, aggregation, indexes, explain and seeding
//! - `types`: request and result types shared by the operations

pub mod manager;
pub mod ops;
pub mod types;

pub use manager::{ConnectionManager, DEFAULT_CONNECT_TIMEOUT};
pub use ops::explain::ExplainFindRequest;
pub use types::{
    ExplainVerbosity, FindDocumentsOptions, IndexSpec, Page, UpdateSummary, WriteScope,
};
