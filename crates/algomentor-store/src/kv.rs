//! Key-value store implementations.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use algomentor_protocols::{KeyValueStore, StoreError};

/// In-memory key-value store.
///
/// Ephemeral profile and test double; contents die with the process.
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// File-backed key-value store, one JSON file per key.
///
/// Durable across restarts. Keys are the runtime's own
/// (`chat_<id>`, `firstMessage_<id>`, `geminiApiKey`) and are safe as
/// file names.
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let json = tokio::fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let json = serde_json::to_string_pretty(&value)?;
        let path = self.entry_path(key);

        tokio::fs::write(&path, json).await?;
        debug!("Saved key {} to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key);

        if path.exists() {
            tokio::fs::remove_file(&path).await?;
            debug!("Removed key file: {:?}", path);
        }
        Ok(())
    }
}
