//! Application settings with persistence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bson::{ExtendedJsonMode, OutputLayout};
use crate::models::ConnectionTarget;
use crate::models::connection::{DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_URI};

pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where to connect by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ConnectionSettings {
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new(&self.uri, &self.database, &self.collection)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            connect_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Defaults for read queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { page_size: default_page_size() }
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub json_mode: ExtendedJsonMode,
    #[serde(default)]
    pub layout: OutputLayout,
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
