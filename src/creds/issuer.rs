//! Credential issuer.

use std::{sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{info, warn};

use crate::{
    config::ConfigStore,
    context::RequestContext,
    creds::{
        IssuedCredential, IssuedSecret, ROBOT_ACCOUNT_SECRET_TYPE,
        naming::{MonotonicNanos, robot_account_name},
    },
    errors::BackendError,
    leases::{InternalData, PlatformDefaults},
    registry::{ClientCache, RobotCreate, SYSTEM_LEVEL},
    roles::RoleStore,
    sensitive::Sensitive,
};

/// Description attached to every robot account this backend creates.
pub const ROBOT_DESCRIPTION: &str = "This robot account is created by Vault, please DO NOT edit!";

const SECONDS_PER_DAY: u64 = 86_400;

/// Registry-side validity in whole days for a role's `max_ttl`.
///
/// One day more than the whole days in `max_ttl`. A zero `max_ttl` yields a
/// single day; the lease itself still falls back to the platform maximum.
#[must_use]
pub fn robot_duration_days(max_ttl: Duration) -> i64 {
    i64::try_from(max_ttl.as_secs() / SECONDS_PER_DAY + 1).unwrap_or(i64::MAX)
}

/// Creates one registry robot account per call.
///
/// Retries create additional accounts; there is no deduplication.
#[derive(Debug)]
pub struct CredentialIssuer {
    roles: RoleStore,
    config: ConfigStore,
    clients: Arc<ClientCache>,
    defaults: PlatformDefaults,
    clock: MonotonicNanos,
}

impl CredentialIssuer {
    /// Create an issuer.
    #[must_use]
    pub fn new(
        roles: RoleStore,
        config: ConfigStore,
        clients: Arc<ClientCache>,
        defaults: PlatformDefaults,
    ) -> Self {
        Self::with_clock(roles, config, clients, defaults, MonotonicNanos::new())
    }

    /// Create an issuer with an explicit timestamp source.
    #[must_use]
    pub fn with_clock(
        roles: RoleStore,
        config: ConfigStore,
        clients: Arc<ClientCache>,
        defaults: PlatformDefaults,
        clock: MonotonicNanos,
    ) -> Self {
        Self {
            roles,
            config,
            clients,
            defaults,
            clock,
        }
    }

    /// Issue a new robot account for `role_name`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::RoleNotFound`] when the role is absent, a
    /// config error when the client cannot be built, a remote error when the
    /// registry rejects the request, and [`BackendError::Cancelled`] when
    /// `ctx` is cancelled first. Nothing is cleaned up on the registry after
    /// a cancellation.
    pub async fn issue(
        &self,
        ctx: &RequestContext,
        role_name: &str,
    ) -> Result<IssuedSecret, BackendError> {
        let role = self
            .roles
            .read(role_name)
            .await?
            .ok_or_else(|| BackendError::RoleNotFound(role_name.to_string()))?;

        let name = robot_account_name(
            role_name,
            ctx.display_name.as_deref(),
            self.clock.next_nanos(),
        );
        let lease = role.lease_policy(&self.defaults);

        let request = RobotCreate {
            name: name.clone(),
            description: ROBOT_DESCRIPTION.to_string(),
            disable: false,
            duration: robot_duration_days(role.max_ttl),
            level: SYSTEM_LEVEL.to_string(),
            permissions: role.permissions,
        };

        let client = self.clients.get(ctx, &self.config).await?;

        let created = ctx
            .run(async {
                client
                    .create_robot_account(&request)
                    .await
                    .map_err(|source| {
                        BackendError::remote("error creating Harbor robot account", source)
                    })
            })
            .await
            .inspect_err(|error| {
                warn!(role = role_name, %name, "robot account creation failed: {error}");
            })?;

        let token = Sensitive::new(format!("{}:{}", created.name, created.secret.expose()));

        info!(role = role_name, %name, id = created.id, "robot account issued");

        Ok(IssuedSecret {
            secret_type: ROBOT_ACCOUNT_SECRET_TYPE,
            data: IssuedCredential {
                id: created.id,
                auth_token: Sensitive::new(BASE64.encode(token.expose())),
                name: created.name,
                secret: created.secret,
            },
            internal: InternalData {
                role: role_name.to_string(),
                robot_account_name: name,
            },
            lease,
        })
    }
}
