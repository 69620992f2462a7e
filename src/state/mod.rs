// Persisted configuration

pub mod config;
pub mod settings;

pub use config::ConfigManager;
pub use settings::{AppSettings, ConnectionSettings, OutputSettings, QuerySettings};
