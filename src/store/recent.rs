//! Bounded most-recent-first list of search queries

use parking_lot::Mutex;
use std::path::PathBuf;

use super::{JsonFile, StoreError};

/// Maximum number of recent searches kept on disk
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Recent searches persisted as a JSON array of strings
///
/// Values are unique; adding an existing value moves it to the front.
#[derive(Debug)]
pub struct RecentSearches {
    file: JsonFile,
    lock: Mutex<()>,
}

impl RecentSearches {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            lock: Mutex::new(()),
        }
    }

    /// Returns the stored searches, most recent first
    ///
    /// A missing file is initialized to an empty list. An unreadable file is
    /// treated as empty.
    pub fn list(&self) -> Vec<String> {
        let _guard = self.lock.lock();

        match self.file.read::<Vec<String>>() {
            Ok(Some(searches)) => searches,
            Ok(None) => {
                if let Err(e) = self.file.write(&Vec::<String>::new()) {
                    tracing::warn!(
                        "Failed to initialize {}: {}",
                        self.file.path().display(),
                        e
                    );
                }
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read recent searches from {}: {}",
                    self.file.path().display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Moves `value` to the front of the list and persists it
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - The updated list
    /// * `Err(StoreError)` - If the list could not be written
    pub fn add(&self, value: &str) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock();

        let mut searches = self
            .file
            .read::<Vec<String>>()
            .unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable recent searches: {}", e);
                None
            })
            .unwrap_or_default();

        push_front_unique(&mut searches, value, MAX_RECENT_SEARCHES);
        self.file.write(&searches)?;

        Ok(searches)
    }
}

/// Inserts `value` at the front, dropping any earlier occurrence, then
/// truncates to `capacity`
fn push_front_unique(list: &mut Vec<String>, value: &str, capacity: usize) {
    list.retain(|existing| existing != value);
    list.insert(0, value.to_string());
    list.truncate(capacity);
}
