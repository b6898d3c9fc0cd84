//! Lease renew and revoke callbacks.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    config::ConfigStore,
    context::RequestContext,
    errors::BackendError,
    leases::{
        LeaseDataError, LeasePolicy, PlatformDefaults, ROBOT_ACCOUNT_NAME_FIELD, ROLE_FIELD,
        string_field,
    },
    registry::ClientCache,
    roles::RoleStore,
};

/// Handles the platform's lease lifecycle callbacks.
#[derive(Debug, Clone)]
pub struct LeaseManager {
    roles: RoleStore,
    config: ConfigStore,
    clients: Arc<ClientCache>,
    defaults: PlatformDefaults,
}

impl LeaseManager {
    /// Create a manager.
    #[must_use]
    pub fn new(
        roles: RoleStore,
        config: ConfigStore,
        clients: Arc<ClientCache>,
        defaults: PlatformDefaults,
    ) -> Self {
        Self {
            roles,
            config,
            clients,
            defaults,
        }
    }

    /// Delete the robot account recorded in `internal`.
    ///
    /// # Errors
    ///
    /// Returns a lease data error when the account name is missing or not a
    /// string, a config error when the client cannot be built, a remote error
    /// when the registry lookup or deletion fails (including an account that
    /// is already gone), and [`BackendError::Cancelled`] when `ctx` fires
    /// first.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        internal: &Map<String, Value>,
    ) -> Result<(), BackendError> {
        let name = lease_field(internal, ROBOT_ACCOUNT_NAME_FIELD)?;

        let client = self.clients.get(ctx, &self.config).await?;

        ctx.run(async {
            client
                .delete_robot_account_by_name(name)
                .await
                .map_err(|source| BackendError::remote("error revoking robot account", source))
        })
        .await
        .inspect_err(|error| warn!(%name, "robot account revocation failed: {error}"))?;

        info!(%name, "robot account revoked");

        Ok(())
    }

    /// Recompute TTLs for a lease from the current definition of its role.
    ///
    /// The registry is not contacted; the robot account keeps the expiry it
    /// was created with.
    ///
    /// # Errors
    ///
    /// Returns a lease data error when the role name is missing or not a
    /// string, [`BackendError::RoleNotFound`] when the role has been
    /// deleted, and [`BackendError::Cancelled`] when `ctx` has fired.
    pub async fn renew(
        &self,
        ctx: &RequestContext,
        internal: &Map<String, Value>,
    ) -> Result<LeasePolicy, BackendError> {
        if ctx.cancellation.is_cancelled() {
            return Err(BackendError::Cancelled);
        }

        let role_name = lease_field(internal, ROLE_FIELD)?;

        let role = self
            .roles
            .read(role_name)
            .await?
            .ok_or_else(|| BackendError::RoleNotFound(role_name.to_string()))?;

        let policy = role.lease_policy(&self.defaults);

        info!(role = role_name, ttl = ?policy.ttl, max_ttl = ?policy.max_ttl, "lease renewed");

        Ok(policy)
    }
}

fn lease_field<'a>(
    internal: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, LeaseDataError> {
    string_field(internal, field).inspect_err(|error| warn!("rejecting lease: {error}"))
}
