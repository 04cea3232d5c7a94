//! Durable settings storage seam.
//!
//! The relay persists two string pairs (selected endpoint id and the encoded
//! page cache) through whatever store the host injects. [`MemoryStore`]
//! covers hosts that persist elsewhere and tests; [`FileStore`] is a
//! batteries-included JSON file store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read settings: {0}")]
    Read(String),
    #[error("failed to write settings: {0}")]
    Write(String),
}

/// Durable string key-value store
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, cloneable so hosts and tests can keep a handle to the
/// same backing map after handing one clone to the session.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Read("settings store mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Write("settings store mutex poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store keeping all pairs in one JSON object.
///
/// Writes go through a temp file and an atomic rename so a crash mid-write
/// never leaves a half-written settings file behind.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `~/.corsrelay/settings.json`.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::Read("home directory not found".to_string()))?;
        Ok(home.join(".corsrelay").join("settings.json"))
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|err| StoreError::Read(format!("settings file is not valid JSON: {}", err))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(StoreError::Read(err.to_string())),
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| StoreError::Write(format!("failed to create directory: {}", err)))?;
        }

        // Write to temporary file, then atomic rename
        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(map)
            .map_err(|err| StoreError::Write(format!("failed to serialize settings: {}", err)))?;

        std::fs::write(&temp_path, content)
            .map_err(|err| StoreError::Write(format!("failed to write temp file: {}", err)))?;

        std::fs::rename(&temp_path, &self.path)
            .map_err(|err| StoreError::Write(format!("failed to rename temp file: {}", err)))?;

        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }
}
