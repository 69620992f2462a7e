pub mod bson;
pub mod cli;
pub mod connection;
pub mod error;
pub mod helpers;
pub mod models;
pub mod reports;
pub mod state;
