//! BSON utilities for parsing shell-style input and formatting results.

mod formatter;
mod keys;
mod parser;
mod value;

pub use formatter::*;
pub use keys::*;
pub use parser::*;
pub use value::*;
