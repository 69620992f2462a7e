//! Aggregation pipeline operations.

use mongodb::Client;
use mongodb::bson::Document;

use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::reports::Report;

impl ConnectionManager {
    /// Run an aggregation pipeline for a collection (runs in Tokio runtime)
    pub fn aggregate_pipeline(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>> {
        use futures::TryStreamExt;

        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        log::debug!("aggregate {database}.{collection} with {} stages", pipeline.len());

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let cursor = coll.aggregate(pipeline).await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            Ok(docs)
        })
    }

    /// Run one of the named inventory reports, optionally narrowed by `filter`
    pub fn run_report(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        report: Report,
        filter: Option<Document>,
    ) -> Result<Vec<Document>> {
        let pipeline = report.pipeline_with_filter(filter);
        self.aggregate_pipeline(client, database, collection, pipeline)
    }
}
