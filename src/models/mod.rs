// Data structures and types

pub mod book;
pub mod connection;

pub use book::{Book, BookFilter, merge_filters, parse_books, sample_books};
pub use connection::ConnectionTarget;
