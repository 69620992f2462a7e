//! Book inventories used across the integration tests.

#![allow(dead_code)]

use bookstore::models::{Book, sample_books};

/// The bundled sample inventory (12 books).
pub fn inventory() -> Vec<Book> {
    sample_books().expect("bundled inventory is valid")
}

/// Small inventory where two authors tie for the most books.
pub fn tied_authors() -> Vec<Book> {
    vec![
        Book::new("Emma", "Jane Austen", "Romance", 1815, 8.5, true),
        Book::new("Persuasion", "Jane Austen", "Romance", 1817, 7.0, false),
        Book::new("Dune", "Frank Herbert", "Science Fiction", 1965, 11.0, true),
        Book::new("Children of Dune", "Frank Herbert", "Science Fiction", 1976, 10.0, true),
        Book::new("Neuromancer", "William Gibson", "Science Fiction", 1984, 9.0, true),
    ]
}

/// Books spread over a few decades, including a mid-decade year.
pub fn decades() -> Vec<Book> {
    vec![
        Book::new("Carrie", "Stephen King", "Horror", 1974, 7.99, true),
        Book::new("Salem's Lot", "Stephen King", "Horror", 1975, 8.99, true),
        Book::new("The Shining", "Stephen King", "Horror", 1977, 9.99, false),
        Book::new("It", "Stephen King", "Horror", 1986, 12.99, true),
        Book::new("The Stand", "Stephen King", "Horror", 1978, 11.99, true),
        Book::new("Misery", "Stephen King", "Horror", 1987, 10.99, true),
        Book::new("11/22/63", "Stephen King", "Historical", 2011, 14.99, true),
    ]
}

/// A page-size-friendly inventory of `count` numbered books.
pub fn numbered(count: usize) -> Vec<Book> {
    (0..count)
        .map(|i| {
            Book::new(
                format!("Volume {i:02}"),
                "Serial Author",
                if i % 2 == 0 { "Fiction" } else { "Mystery" },
                1950 + i as i32,
                5.0 + i as f64,
                i % 3 != 0,
            )
        })
        .collect()
}
