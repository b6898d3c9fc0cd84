//! Lazily constructed, shared registry client.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::ConfigStore,
    context::RequestContext,
    errors::BackendError,
    registry::{ClientFactory, RegistryClient},
};

/// Holds at most one live client per configuration epoch.
///
/// Readers share the cached client without blocking each other. Building a
/// client takes the write lock and re-checks the slot, so concurrent misses
/// construct exactly once. [`invalidate`](Self::invalidate) also takes the
/// write lock: a `get` that starts after it returns never sees the old
/// client.
pub struct ClientCache {
    factory: Arc<dyn ClientFactory>,
    client: RwLock<Option<Arc<dyn RegistryClient>>>,
}

impl std::fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCache").finish_non_exhaustive()
    }
}

impl ClientCache {
    /// Create an empty cache that builds clients with `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            client: RwLock::new(None),
        }
    }

    /// Return the cached client, building it from the stored config on a miss.
    ///
    /// A missing config is treated as an empty one, so construction fails
    /// with a config error rather than a lookup error.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read, the factory rejects it,
    /// or the request is cancelled during construction.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        config: &ConfigStore,
    ) -> Result<Arc<dyn RegistryClient>, BackendError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(Arc::clone(client));
        }

        let mut slot = self.client.write().await;

        // Another caller may have finished construction while we waited.
        if let Some(client) = slot.as_ref() {
            debug!("registry client constructed by concurrent caller");

            return Ok(Arc::clone(client));
        }

        let config = config.get().await?.unwrap_or_default();
        let client = ctx.run(self.factory.build(&config)).await?;

        info!(url = %config.url, "registry client constructed");

        *slot = Some(Arc::clone(&client));

        Ok(client)
    }

    /// Drop the cached client, if any.
    pub async fn invalidate(&self) {
        if self.client.write().await.take().is_some() {
            debug!("registry client invalidated");
        }
    }

    /// Whether a client is currently cached.
    pub async fn is_cached(&self) -> bool {
        self.client.read().await.is_some()
    }
}
