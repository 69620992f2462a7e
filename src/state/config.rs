// Configuration management for persistent settings

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::settings::AppSettings;

const APP_NAME: &str = "bookstore";

/// Manages the settings file
#[derive(Clone, Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    settings_file: String,
}

impl ConfigManager {
    const SETTINGS_FILE: &'static str = "config.json";

    /// Use the platform config directory (`~/.config/bookstore` on Linux)
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .context("Could not determine config directory")?;
        Ok(Self { config_dir, settings_file: Self::SETTINGS_FILE.to_string() })
    }

    /// Use an explicit settings file instead of the platform default
    pub fn with_file(path: &Path) -> Result<Self> {
        let settings_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid config file path {}", path.display()))?
            .to_string();
        let config_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { config_dir, settings_file })
    }

    /// Full path of the settings file
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }

    /// Load data from a JSON file
    fn load_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let value: T = serde_json::from_str(&data)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;

        Ok(Some(value))
    }

    /// Save data to a JSON file (atomic via temp + rename).
    fn save_json<T: Serialize + ?Sized>(&self, path: &Path, data: &T) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(data)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;

        atomic_write(path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Load settings, falling back to defaults when no file exists
    pub fn load_settings(&self) -> Result<AppSettings> {
        let path = self.settings_path();
        let settings = self.load_json(&path)?;
        if settings.is_none() {
            log::debug!("no settings at {}, using defaults", path.display());
        }
        Ok(settings.unwrap_or_default())
    }

    /// Save settings to disk
    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.save_json(&self.settings_path(), settings)
    }
}

/// Write `data` to `path` atomically: write to a sibling temp file first, then
/// rename, so a reader never sees a partially written file.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(path);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
