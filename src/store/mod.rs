//! File-backed stores for recent searches and user settings
//!
//! Each store keeps a single JSON document on disk and rewrites it whole on
//! every mutation. Reads that fail (missing or corrupt file) degrade to an
//! empty or default document; failed writes are reported to the caller.

mod recent;
mod settings;

pub use recent::{RecentSearches, MAX_RECENT_SEARCHES};
pub use settings::{default_settings, Settings, SettingsStore};

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the recent-searches list inside the data directory
pub const RECENT_SEARCHES_FILE: &str = "recent_searches.json";

/// File name of the settings mapping inside the data directory
pub const SETTINGS_FILE: &str = "user_settings.json";

/// Errors that can occur when reading or writing a store file
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming the file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not the expected JSON document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A JSON document stored at a fixed path
///
/// Writes go to a sibling temporary file that is then renamed over the target,
/// so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the document
    ///
    /// # Returns
    /// * `Ok(None)` if the file does not exist
    /// * `Ok(Some(T))` if it exists and parses
    /// * `Err` if it cannot be read or parsed
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Serializes `data` and replaces the document with it
    ///
    /// Creates the parent directory if it is missing.
    pub fn write<T: Serialize + ?Sized>(&self, data: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(data)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
