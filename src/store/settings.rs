//! Flat user settings persisted as a JSON object

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

use super::{JsonFile, StoreError};

/// Option name to value
pub type Settings = Map<String, Value>;

/// Settings returned before anything has been saved
pub fn default_settings() -> Settings {
    let mut settings = Settings::new();
    settings.insert("units".to_string(), json!("imperial"));
    settings.insert("defaultCity".to_string(), json!("London"));
    settings.insert("theme".to_string(), json!("light"));
    settings
}

/// Settings store with merge-on-update semantics
///
/// Options absent from an update keep their previous value.
#[derive(Debug)]
pub struct SettingsStore {
    file: JsonFile,
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            lock: Mutex::new(()),
        }
    }

    /// Returns the defaults overlaid with whatever has been saved
    pub fn get(&self) -> Settings {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Merges `update` into the stored settings and persists the result
    pub fn update(&self, update: Settings) -> Result<Settings, StoreError> {
        let _guard = self.lock.lock();

        let mut settings = self.load();
        settings.extend(update);
        self.file.write(&settings)?;

        Ok(settings)
    }

    fn load(&self) -> Settings {
        let mut settings = default_settings();
        match self.file.read::<Settings>() {
            Ok(Some(saved)) => settings.extend(saved),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                "Failed to read settings from {}, using defaults: {}",
                self.file.path().display(),
                e
            ),
        }
        settings
    }
}
