//! Path handlers exposed to the host secrets platform.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    config::{CONFIG_KEY, ConfigError, ConfigRequest, ConfigStore, ConfigView},
    context::RequestContext,
    creds::{CredentialIssuer, IssuedSecret},
    errors::BackendError,
    leases::{LeaseManager, LeasePolicy, PlatformDefaults},
    registry::{ClientCache, ClientFactory, HarborClientFactory},
    roles::{RoleRequest, RoleStore, RoleView, WriteOperation, normalize_role_name},
    storage::Storage,
};

/// A mounted instance of the Harbor robot account backend.
#[derive(Debug)]
pub struct Backend {
    config: ConfigStore,
    roles: RoleStore,
    clients: Arc<ClientCache>,
    issuer: CredentialIssuer,
    leases: LeaseManager,
}

impl Backend {
    /// Create a backend that talks to Harbor over HTTP.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, defaults: PlatformDefaults) -> Self {
        Self::with_client_factory(storage, defaults, Arc::new(HarborClientFactory))
    }

    /// Create a backend that builds registry clients with `factory`.
    #[must_use]
    pub fn with_client_factory(
        storage: Arc<dyn Storage>,
        defaults: PlatformDefaults,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        let clients = Arc::new(ClientCache::new(factory));
        let config = ConfigStore::new(Arc::clone(&storage), Arc::clone(&clients));
        let roles = RoleStore::new(storage);

        Self {
            issuer: CredentialIssuer::new(
                roles.clone(),
                config.clone(),
                Arc::clone(&clients),
                defaults,
            ),
            leases: LeaseManager::new(
                roles.clone(),
                config.clone(),
                Arc::clone(&clients),
                defaults,
            ),
            config,
            roles,
            clients,
        }
    }

    /// `config` write: merge `request` into the stored profile.
    ///
    /// # Errors
    ///
    /// Returns a config error when the merged profile is incomplete, and
    /// storage errors unchanged. Nothing is written on error.
    pub async fn write_config(&self, request: ConfigRequest) -> Result<(), BackendError> {
        let config = self.config.get().await?.unwrap_or_default().merged(request);

        config.ensure_complete()?;

        self.config.set(&config).await
    }

    /// `config` read. The password is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when no profile was written.
    pub async fn read_config(&self) -> Result<ConfigView, BackendError> {
        let config = self.config.get().await?.ok_or(ConfigError::NotConfigured)?;

        Ok(ConfigView::from(&config))
    }

    /// `roles/{name}` create or update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input and storage errors
    /// unchanged.
    pub async fn write_role(
        &self,
        name: &str,
        operation: WriteOperation,
        request: RoleRequest,
    ) -> Result<(), BackendError> {
        self.roles.create_or_update(name, operation, request).await?;

        Ok(())
    }

    /// `roles/{name}` read, `None` when the role does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the entry is corrupt.
    pub async fn read_role(&self, name: &str) -> Result<Option<RoleView>, BackendError> {
        let Some(role) = self.roles.read(name).await? else {
            return Ok(None);
        };

        Ok(Some(RoleView::try_from(&role)?))
    }

    /// `roles/{name}` delete. Outstanding credentials are unaffected.
    ///
    /// # Errors
    ///
    /// Returns storage errors unchanged.
    pub async fn delete_role(&self, name: &str) -> Result<(), BackendError> {
        self.roles.delete(name).await
    }

    /// `roles/` list.
    ///
    /// # Errors
    ///
    /// Returns storage errors unchanged.
    pub async fn list_roles(&self) -> Result<Vec<String>, BackendError> {
        self.roles.list().await
    }

    /// `creds/{name}` read: issue a fresh robot account.
    ///
    /// # Errors
    ///
    /// See [`CredentialIssuer::issue`].
    pub async fn read_creds(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<IssuedSecret, BackendError> {
        self.issuer.issue(ctx, &normalize_role_name(name)).await
    }

    /// `creds/{name}` update. Identical to [`read_creds`](Self::read_creds).
    ///
    /// # Errors
    ///
    /// See [`CredentialIssuer::issue`].
    pub async fn update_creds(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<IssuedSecret, BackendError> {
        self.read_creds(ctx, name).await
    }

    /// Lease revoke callback.
    ///
    /// # Errors
    ///
    /// See [`LeaseManager::revoke`].
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        internal: &Map<String, Value>,
    ) -> Result<(), BackendError> {
        self.leases.revoke(ctx, internal).await
    }

    /// Lease renew callback.
    ///
    /// # Errors
    ///
    /// See [`LeaseManager::renew`].
    pub async fn renew(
        &self,
        ctx: &RequestContext,
        internal: &Map<String, Value>,
    ) -> Result<LeasePolicy, BackendError> {
        self.leases.renew(ctx, internal).await
    }

    /// Platform notification that `key` changed behind the backend's back,
    /// e.g. through replication.
    pub async fn invalidate(&self, key: &str) {
        if key == CONFIG_KEY {
            self.clients.invalidate().await;
        } else {
            debug!(key, "ignoring invalidation");
        }
    }
}
