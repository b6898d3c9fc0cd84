//! Config store.

use std::sync::Arc;

use tracing::debug;

use crate::{
    config::Config, errors::BackendError, registry::ClientCache, storage::Storage,
};

/// Storage key of the singleton connection profile.
pub const CONFIG_KEY: &str = "config";

/// Persists the connection profile and invalidates the shared client on
/// every write.
#[derive(Clone)]
pub struct ConfigStore {
    storage: Arc<dyn Storage>,
    clients: Arc<ClientCache>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Create a store that invalidates `clients` whenever it writes.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, clients: Arc<ClientCache>) -> Self {
        Self { storage, clients }
    }

    /// Read the stored profile, `None` when never configured.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the entry is corrupt.
    pub async fn get(&self) -> Result<Option<Config>, BackendError> {
        let Some(bytes) = self.storage.get(CONFIG_KEY).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Persist `config` and drop the cached client.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or storage fails. The cache is left
    /// untouched in that case.
    pub async fn set(&self, config: &Config) -> Result<(), BackendError> {
        let bytes = serde_json::to_vec(config)?;

        self.storage.put(CONFIG_KEY, bytes).await?;

        debug!(url = %config.url, "registry configuration updated");

        self.clients.invalidate().await;

        Ok(())
    }
}
