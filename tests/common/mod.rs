//! Shared MongoDB container for the integration tests.
//!
//! Each `tests/*.rs` file is its own binary and starts at most one MongoDB 7.0
//! container. Tests stay isolated by giving every handle its own database name
//! (`bookstore_<8 hex chars>`). The container lives on a background thread with
//! its own runtime and is removed by an `atexit` hook.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::OnceLock;

use bookstore::connection::ConnectionManager;
use bookstore::models::{Book, ConnectionTarget};
use mongodb::Client;
use mongodb::bson::Document;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

fn shared_connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let uri = format!("mongodb://{host}:{port}");

                let probe = Client::with_uri_str(&uri).await.expect("Failed to create probe");
                for _ in 0..30 {
                    if probe.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(uri).expect("Failed to send connection string");
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// One test's view of the shared container: its own database, one
/// `ConnectionManager`, and a client connected through it.
///
/// All methods block, so build and use it inside [`run_blocking`].
pub struct BookstoreTestDb {
    pub manager: ConnectionManager,
    pub client: Client,
    pub target: ConnectionTarget,
}

impl BookstoreTestDb {
    pub fn connect() -> Self {
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let target = ConnectionTarget::new(
            shared_connection_string(),
            format!("bookstore_{test_id}"),
            "books",
        );
        let manager = ConnectionManager::new().expect("Failed to create manager");
        let client = manager.connect(&target).expect("Failed to connect");
        Self { manager, client, target }
    }

    pub fn db(&self) -> &str {
        &self.target.database
    }

    pub fn coll(&self) -> &str {
        &self.target.collection
    }

    /// Connect and insert `books` into a fresh collection.
    pub fn with_books(books: &[Book]) -> Self {
        let db = Self::connect();
        let inserted = db
            .manager
            .seed_books(&db.client, db.db(), db.coll(), books, true)
            .expect("Failed to seed books");
        assert_eq!(inserted, books.len());
        db
    }

    pub fn find(&self, filter: Document) -> Vec<Document> {
        let opts = bookstore::connection::FindDocumentsOptions::with_filter(filter);
        self.manager
            .find_documents(&self.client, self.db(), self.coll(), opts)
            .expect("Failed to find documents")
    }

    pub fn count(&self, filter: Document) -> u64 {
        self.manager
            .count_documents(&self.client, self.db(), self.coll(), filter)
            .expect("Failed to count documents")
    }
}

/// Run connection-manager code off the test's async runtime.
pub async fn run_blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked while running connection-manager operation")
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
