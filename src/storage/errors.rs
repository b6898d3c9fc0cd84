//! Storage errors.

use thiserror::Error;

/// Failure reported by a [`Storage`](super::Storage) implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not complete the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}
