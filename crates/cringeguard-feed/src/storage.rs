//! Persisted key-value storage
//!
//! The extension keeps its settings and counters in a small key-value store
//! read with bulk get-by-keys and written with bulk set. Two backends are
//! provided: an in-memory map and a JSON object file.

use async_trait::async_trait;
use cringeguard_core::{Error, Result};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Keys used in the store
pub mod storage_keys {
    pub const API_KEY: &str = "groqApiKey";
    pub const IS_ENABLED: &str = "isEnabled";
    pub const CRINGE_COUNT: &str = "cringeCount";
    pub const TIME_SAVED: &str = "timeSavedInMinutes";
    pub const CUSTOM_CRITERIA: &str = "customCriteria";

    /// Every key the extension reads
    pub const ALL: &[&str] = &[API_KEY, IS_ENABLED, CRINGE_COUNT, TIME_SAVED, CUSTOM_CRITERIA];
}

/// Bulk key-value access; every failure surfaces as [`Error::Storage`]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the given keys; absent keys are simply missing from the result
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;

    /// Write every item, overwriting existing values
    async fn set(&self, items: Map<String, Value>) -> Result<()>;

    /// Delete the given keys
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

fn select(all: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| all.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

/// Store held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        Ok(select(&self.data.read(), keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.data.write().extend(items);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut data = self.data.write();
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

/// Store persisted as a single JSON object file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Use `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file a new snapshot is written to before it replaces `path`
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::storage(format!("{}: {e}", self.path.display()))),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::storage(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(Error::storage(format!("{}: {e}", self.path.display()))),
        }
    }

    /// Write the whole object to a staging file, then rename it over `path`.
    /// Readers and crashes never observe a partially written file.
    async fn save(&self, data: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(data).map_err(|e| Error::storage(e.to_string()))?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| Error::storage(format!("{}: {e}", staging.display())))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| Error::storage(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), keys = data.len(), "storage written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        Ok(select(&self.load().await?, keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;
        data.extend(items);
        self.save(&data).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;
        for key in keys {
            data.remove(*key);
        }
        self.save(&data).await
    }
}
