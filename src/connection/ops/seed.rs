//! Loading the inventory collection from validated book records.

use mongodb::Client;

use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::models::Book;

impl ConnectionManager {
    /// Insert `books`, optionally dropping the collection first.
    ///
    /// Every record is validated before anything is written, so an invalid
    /// record leaves the collection untouched.
    pub fn seed_books(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        books: &[Book],
        drop_first: bool,
    ) -> Result<usize> {
        for book in books {
            book.validate()?;
        }

        if drop_first {
            self.drop_collection(client, database, collection)?;
        }

        let documents = books.iter().map(Book::to_document).collect();
        let inserted = self.insert_documents(client, database, collection, documents)?;
        log::info!("seeded {inserted} books into {database}.{collection}");
        Ok(inserted)
    }
}
