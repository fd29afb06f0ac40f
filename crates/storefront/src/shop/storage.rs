//! Durable key/value storage behind the shop store.
//!
//! The storefront persists a visitor's cart and orders in their session
//! (`tower_sessions::Session`). [`MemoryStorage`] backs tests and tools that
//! run without an HTTP session.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_sessions::Session;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session backend failed to load or save.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string-keyed store of JSON-encoded values.
pub trait DurableStorage: Send + Sync {
    /// Load the value stored under `key`, `None` when absent.
    fn load<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>, StorageError>> + Send;

    /// Replace the value stored under `key`.
    fn store<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl DurableStorage for Session {
    async fn load<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, StorageError> {
        Ok(self.get::<T>(key).await?)
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        Ok(self.insert(key, value).await?)
    }
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, serde_json::Value>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw JSON value, bypassing typed encoding.
    pub async fn put_raw(&self, key: &str, value: serde_json::Value) {
        self.values.lock().await.insert(key.to_string(), value);
    }

    /// The raw JSON value under `key`.
    pub async fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().await.get(key).cloned()
    }
}

impl DurableStorage for MemoryStorage {
    async fn load<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let value = self.values.lock().await.get(key).cloned();
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_value(value)?;
        self.values.lock().await.insert(key.to_string(), encoded);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_missing_key() {
        let storage = MemoryStorage::new();
        let value: Option<Vec<String>> = storage.load("absent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_values() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.store("greeting", &"hello").await.unwrap();
        let value: Option<String> = other.load("greeting").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_memory_storage_reports_decode_error() {
        let storage = MemoryStorage::new();
        storage.put_raw("count", serde_json::json!("not a number")).await;
        let result: Result<Option<u32>, _> = storage.load("count").await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
