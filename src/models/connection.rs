// Connection target model

use serde::{Deserialize, Serialize};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION: &str = "books";

/// Where operations are sent: a deployment, a database and a collection in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl ConnectionTarget {
    pub fn new(
        uri: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self { uri: uri.into(), database: database.into(), collection: collection.into() }
    }

    /// `database.collection`, as the server names it.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self::new(DEFAULT_URI, DEFAULT_DATABASE, DEFAULT_COLLECTION)
    }
}
