//! Document reads and writes for a collection.

use mongodb::Client;
use mongodb::bson::Document;

use crate::connection::ConnectionManager;
use crate::connection::types::{FindDocumentsOptions, UpdateSummary, WriteScope};
use crate::error::Result;

impl ConnectionManager {
    /// Find documents in a collection (runs in Tokio runtime)
    pub fn find_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        opts: FindDocumentsOptions,
    ) -> Result<Vec<Document>> {
        use futures::TryStreamExt;

        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let filter = opts.filter.unwrap_or_default();

        log::debug!(
            "find {database}.{collection} filter={filter} sort={:?} skip={:?} limit={:?}",
            opts.sort,
            opts.skip,
            opts.limit
        );

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);

            let mut options = mongodb::options::FindOptions::default();
            options.skip = opts.skip;
            options.limit = opts.limit;
            options.sort = opts.sort;
            options.projection = opts.projection;

            let cursor = coll.find(filter).with_options(options).await?;
            let documents: Vec<Document> = cursor.try_collect().await?;

            Ok(documents)
        })
    }

    /// Count documents matching a filter (runs in Tokio runtime)
    ///
    /// The count goes through an aggregation `$match`, so `$where` and `$near`
    /// filters that `find_documents` accepts are rejected here.
    pub fn count_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let count = coll.count_documents(filter).await?;
            Ok(count)
        })
    }

    /// Insert multiple documents into a collection (runs in Tokio runtime)
    pub fn insert_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let count = documents.len();
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            coll.insert_many(documents).await?;
            log::debug!("inserted {count} documents into {database}.{collection}");
            Ok(count)
        })
    }

    /// Update the first or every document matching `filter` (runs in Tokio runtime)
    ///
    /// `update` must already be an operator document (see `normalize_update`).
    pub fn update_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        filter: Document,
        update: Document,
        scope: WriteScope,
    ) -> Result<UpdateSummary> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        log::debug!("update {scope:?} {database}.{collection} filter={filter} update={update}");

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let result = match scope {
                WriteScope::One => coll.update_one(filter, update).await?,
                WriteScope::Many => coll.update_many(filter, update).await?,
            };
            Ok(UpdateSummary { matched: result.matched_count, modified: result.modified_count })
        })
    }

    /// Delete the first or every document matching `filter` (runs in Tokio runtime)
    pub fn delete_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        filter: Document,
        scope: WriteScope,
    ) -> Result<u64> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        log::debug!("delete {scope:?} {database}.{collection} filter={filter}");

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let result = match scope {
                WriteScope::One => coll.delete_one(filter).await?,
                WriteScope::Many => coll.delete_many(filter).await?,
            };
            Ok(result.deleted_count)
        })
    }
}
