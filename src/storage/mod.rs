//! Key-value storage collaborator.
//!
//! The host platform owns persistence; this crate only needs string keys
//! mapped to opaque bytes. Consistency and locking are the implementation's
//! concern.

mod errors;
mod memory;

use async_trait::async_trait;
use mockall::automock;

pub use errors::StorageError;
pub use memory::MemoryStorage;

#[automock]
#[async_trait]
/// Durable key-value operations provided by the host platform.
pub trait Storage: Send + Sync {
    /// Fetch the value stored at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` at `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List keys under `prefix`, relative to that prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
