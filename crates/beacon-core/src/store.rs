//! Persisted key/value store backends
//!
//! All durable state (project configuration, the active session) lives in a
//! key/value store that survives across invocations within the same scope.
//! The store is injected into every component, so tests run against the
//! in-memory backend while production uses one JSON file per key.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{BeaconError, BeaconResult};

/// Persisted key/value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> BeaconResult<Option<Value>>;

    /// Write `value` under `key`, overwriting any prior value
    async fn set(&self, key: &str, value: Value) -> BeaconResult<()>;

    /// Remove the value stored under `key`
    async fn delete(&self, key: &str) -> BeaconResult<()>;
}

/// Shared store handle passed to components
pub type SharedStore = Arc<dyn KeyValueStore>;

/// File-backed store: one JSON file per key under a base directory
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the given directory
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> BeaconResult<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await.map_err(|e| {
                BeaconError::io_path(
                    format!("Failed to create store directory: {}", e),
                    self.base_path.display().to_string(),
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> BeaconResult<Option<Value>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await.map_err(|e| {
            BeaconError::io_path(
                format!("Failed to read store file: {}", e),
                path.display().to_string(),
            )
        })?;

        let value: Value = serde_json::from_str(&json)
            .map_err(|e| BeaconError::storage_key(format!("Malformed store file: {}", e), key))?;

        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> BeaconResult<()> {
        self.ensure_dir().await?;

        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(&value)
            .map_err(|e| BeaconError::json(format!("Failed to serialize store value: {}", e)))?;

        fs::write(&path, json).await.map_err(|e| {
            BeaconError::io_path(
                format!("Failed to write store file: {}", e),
                path.display().to_string(),
            )
        })?;

        debug!("Saved key {} to {:?}", key, path);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BeaconResult<()> {
        let path = self.key_path(key);

        if path.exists() {
            fs::remove_file(&path).await.map_err(|e| {
                BeaconError::io_path(
                    format!("Failed to delete store file: {}", e),
                    path.display().to_string(),
                )
            })?;
            debug!("Deleted key {} from {:?}", key, path);
        }

        Ok(())
    }
}

/// In-memory store (for testing or throwaway clients)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> BeaconResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> BeaconResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BeaconResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_set_get() {
        let store = MemoryStore::new();

        store.set("config", json!({"a": 1})).await.unwrap();
        let value = store.get("config").await.unwrap();

        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryStore::new();

        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryStore::new();

        store.set("k", json!("v")).await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("session", json!({"session-id": "s-1"})).await.unwrap();
        let value = store.get("session").await.unwrap();

        assert_eq!(value, Some(json!({"session-id": "s-1"})));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::new(dir.path());
            store.set("config", json!({"endpoint": "e"})).await.unwrap();
        }

        let store = FileStore::new(dir.path());
        assert_eq!(
            store.get("config").await.unwrap(),
            Some(json!({"endpoint": "e"}))
        );
    }

    #[tokio::test]
    async fn test_file_store_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.delete("nothing").await.unwrap();
        assert_eq!(store.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_key_path() {
        let store = FileStore::new("/tmp/beacon-store");
        assert_eq!(
            store.key_path("config").to_string_lossy(),
            "/tmp/beacon-store/config.json"
        );
    }
}
