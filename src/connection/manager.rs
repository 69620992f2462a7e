//! Core ConnectionManager struct and basic connection methods.

use std::time::Duration;

use mongodb::Client;
use mongodb::bson::doc;
use tokio::runtime::{Builder, Runtime};

use crate::error::{Error, Result};
use crate::helpers::validate::{redact_uri_password, validate_mongodb_uri};
use crate::models::ConnectionTarget;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs driver operations one at a time on a private runtime.
///
/// Every method blocks until the server answers, so callers see a plain
/// synchronous API. Do not call these methods from inside another Tokio
/// runtime; wrap them in `spawn_blocking` instead.
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
    connect_timeout: Duration,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a connection manager with a custom connect timeout
    pub fn with_timeout(connect_timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, connect_timeout })
    }

    /// Connect to the target's deployment and ping it (runs in Tokio runtime)
    pub fn connect(&self, target: &ConnectionTarget) -> Result<Client> {
        validate_mongodb_uri(&target.uri).map_err(Error::InvalidArgument)?;
        log::info!(
            "connecting to {} ({})",
            redact_uri_password(&target.uri),
            target.namespace()
        );

        let uri = target.uri.clone();
        let timeout = self.connect_timeout;
        self.runtime.block_on(async {
            let fut = async {
                let client = Client::with_uri_str(&uri).await?;
                client.database("admin").run_command(doc! { "ping": 1 }).await?;
                Ok::<Client, mongodb::error::Error>(client)
            };

            match tokio::time::timeout(timeout, fut).await {
                Ok(result) => result.map_err(Error::from),
                Err(_) => Err(Error::Timeout(format!(
                    "No answer from {} within {}s",
                    redact_uri_password(&uri),
                    timeout.as_secs()
                ))),
            }
        })
    }

    /// Ping the deployment behind an existing client, returning the round trip time
    pub fn ping(&self, client: &Client) -> Result<Duration> {
        let client = client.clone();
        self.runtime.block_on(async {
            let started = std::time::Instant::now();
            client.database("admin").run_command(doc! { "ping": 1 }).await?;
            Ok(started.elapsed())
        })
    }

    /// List collections in a database (runs in Tokio runtime)
    pub fn list_collections(&self, client: &Client, database: &str) -> Result<Vec<String>> {
        let client = client.clone();
        let database = database.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let mut collections = db.list_collection_names().await?;
            collections.sort_unstable_by_key(|name| name.to_lowercase());
            Ok(collections)
        })
    }

    /// Drop a collection in a database (runs in Tokio runtime)
    pub fn drop_collection(&self, client: &Client, database: &str, collection: &str) -> Result<()> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        self.runtime.block_on(async {
            let coll =
                client.database(&database).collection::<mongodb::bson::Document>(&collection);
            coll.drop().await?;
            log::debug!("dropped {database}.{collection}");
            Ok(())
        })
    }
}
