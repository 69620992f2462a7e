//! Explain command operations for find and aggregation.
//!
//! Both go through the server's `explain` command, which plans (and with
//! `executionStats` runs) the query without applying any writes.

use mongodb::Client;
use mongodb::bson::{Document, doc};

use crate::connection::ConnectionManager;
use crate::connection::types::ExplainVerbosity;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct ExplainFindRequest {
    pub database: String,
    pub collection: String,
    pub filter: Option<Document>,
    pub sort: Option<Document>,
    pub projection: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
    pub verbosity: ExplainVerbosity,
}

impl ExplainFindRequest {
    /// The `find` command that gets wrapped in `explain`.
    pub fn find_command(&self) -> Document {
        let mut find_cmd = doc! { "find": self.collection.as_str() };
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.is_empty()) {
            find_cmd.insert("filter", filter.clone());
        }
        if let Some(sort) = self.sort.as_ref().filter(|s| !s.is_empty()) {
            find_cmd.insert("sort", sort.clone());
        }
        if let Some(projection) = self.projection.as_ref().filter(|p| !p.is_empty()) {
            find_cmd.insert("projection", projection.clone());
        }
        if let Some(skip) = self.skip {
            find_cmd.insert("skip", i64::try_from(skip).unwrap_or(i64::MAX));
        }
        if let Some(limit) = self.limit {
            find_cmd.insert("limit", limit);
        }
        find_cmd
    }
}

impl ConnectionManager {
    /// Run explain for a `find` command using selected verbosity.
    pub fn explain_find(&self, client: &Client, request: ExplainFindRequest) -> Result<Document> {
        let client = client.clone();
        let command = doc! {
            "explain": request.find_command(),
            "verbosity": request.verbosity.as_str(),
        };
        let database = request.database;

        self.runtime.block_on(async move {
            let db = client.database(&database);
            let explain = db.run_command(command).await?;
            Ok(explain)
        })
    }

    /// Run explain for an `aggregate` command using selected verbosity.
    pub fn explain_aggregation(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
        verbosity: ExplainVerbosity,
    ) -> Result<Document> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async move {
            let db = client.database(&database);
            let command = doc! {
                "explain": {
                    "aggregate": collection,
                    "pipeline": pipeline,
                    "cursor": {}
                },
                "verbosity": verbosity.as_str()
            };
            let explain = db.run_command(command).await?;
            Ok(explain)
        })
    }
}
