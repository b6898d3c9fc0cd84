//! In-memory [`Storage`] backed by `Arc<RwLock<BTreeMap>>`.
//!
//! Suitable for tests and local development; nothing is persisted.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use super::{Storage, StorageError};

/// Thread-safe in-memory key-value store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock was poisoned by a panicking writer.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().map_err(poisoned)?.len())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock was poisoned by a panicking writer.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(error: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend(format!("memory storage lock poisoned: {error}"))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.inner.read().map_err(poisoned)?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.inner
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.write().map_err(poisoned)?.remove(key);

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let guard = self.inner.read().map_err(poisoned)?;

        Ok(guard
            .range(prefix.to_string()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .filter_map(|key| key.strip_prefix(prefix))
            .map(str::to_string)
            .collect())
    }
}
