use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::bson::default_index_name;
use crate::error::{Error, Result};

/// A 1-based page of a result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    number: u64,
    size: u64,
}

impl Page {
    /// Page numbers start at 1; both values must be positive.
    pub fn new(number: u64, size: u64) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidArgument("Page numbers start at 1".into()));
        }
        if size == 0 {
            return Err(Error::InvalidArgument("Page size must be positive".into()));
        }
        Ok(Self { number, size })
    }

    pub fn number(self) -> u64 {
        self.number
    }

    pub fn size(self) -> u64 {
        self.size
    }

    /// Documents before this page: `(number - 1) * size`.
    pub fn skip(self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }

    /// Number of pages needed for `total` documents at `size` per page.
    pub fn count(total: u64, size: u64) -> u64 {
        if size == 0 { 0 } else { total.div_ceil(size) }
    }
}

/// Options for finding documents
#[derive(Clone, Debug, Default)]
pub struct FindDocumentsOptions {
    pub filter: Option<Document>,
    pub sort: Option<Document>,
    pub projection: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl FindDocumentsOptions {
    pub fn with_filter(filter: Document) -> Self {
        Self { filter: Some(filter), ..Default::default() }
    }

    /// Replace skip/limit with the bounds of `page`.
    pub fn page(mut self, page: Page) -> Self {
        self.skip = Some(page.skip());
        self.limit = Some(page.limit());
        self
    }
}

/// Which matching documents a write touches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteScope {
    /// The first match in natural order
    #[default]
    One,
    Many,
}

/// Outcome of an update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

/// Index definition handed to `createIndexes`
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSpec {
    /// Ordered `field -> 1 | -1` keys
    pub keys: Document,
    pub name: Option<String>,
    pub unique: bool,
}

impl IndexSpec {
    pub fn new(keys: Document) -> Self {
        Self { keys, name: None, unique: false }
    }

    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| default_index_name(&self.keys))
    }

    pub fn to_document(&self) -> Document {
        let mut index = doc! { "key": self.keys.clone(), "name": self.name() };
        if self.unique {
            index.insert("unique", true);
        }
        index
    }
}

/// Verbosity passed to the `explain` command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ExplainVerbosity {
    QueryPlanner,
    #[default]
    ExecutionStats,
    AllPlansExecution,
}

impl ExplainVerbosity {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplainVerbosity::QueryPlanner => "queryPlanner",
            ExplainVerbosity::ExecutionStats => "executionStats",
            ExplainVerbosity::AllPlansExecution => "allPlansExecution",
        }
    }
}
