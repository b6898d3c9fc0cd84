//! Backend errors.

use thiserror::Error;

use crate::{
    config::ConfigError, leases::LeaseDataError, registry::RegistryError, roles::ValidationError,
    storage::StorageError,
};

/// Every failure surfaced to the host platform.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection profile missing or incomplete.
    #[error("invalid registry configuration")]
    Config(#[from] ConfigError),

    /// Malformed role input; storage was not modified.
    #[error("invalid role definition")]
    Validation(#[from] ValidationError),

    /// Referenced role does not exist.
    #[error("role not found: {0}")]
    RoleNotFound(String),

    /// The remote registry rejected or failed a request.
    #[error("{context}")]
    Remote {
        /// What was being attempted.
        context: &'static str,

        /// Underlying registry failure.
        #[source]
        source: RegistryError,
    },

    /// Lease internal data is missing or mistyped.
    #[error("invalid lease data")]
    LeaseData(#[from] LeaseDataError),

    /// The storage collaborator failed.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// A stored entry could not be encoded or decoded.
    #[error("stored entry is not valid json")]
    Serialization(#[from] serde_json::Error),

    /// The request was cancelled while a remote call was in flight.
    #[error("request cancelled")]
    Cancelled,
}

impl BackendError {
    /// Wrap a registry failure with what was being attempted.
    #[must_use]
    pub fn remote(context: &'static str, source: RegistryError) -> Self {
        Self::Remote { context, source }
    }
}
