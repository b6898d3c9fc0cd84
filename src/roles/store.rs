//! Role store.

use std::sync::Arc;

use tracing::debug;

use crate::{
    errors::BackendError,
    roles::{
        Role, RoleRequest, ValidationError, WriteOperation, normalize_role_name,
        parse_permissions, validate_role_name,
    },
    storage::Storage,
};

/// Storage prefix for role entries.
pub const ROLE_PREFIX: &str = "role/";

/// CRUD over role definitions.
#[derive(Clone)]
pub struct RoleStore {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for RoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleStore").finish_non_exhaustive()
    }
}

impl RoleStore {
    /// Create a store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Validate `request` and persist the resulting role under the
    /// lowercased `name`.
    ///
    /// Nothing is written when validation fails.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for bad names, durations or permissions,
    /// and storage errors unchanged.
    pub async fn create_or_update(
        &self,
        name: &str,
        operation: WriteOperation,
        request: RoleRequest,
    ) -> Result<Role, BackendError> {
        let name = normalize_role_name(name);

        validate_role_name(&name)?;

        let existing = self.read(&name).await?;
        let creating = operation == WriteOperation::Create || existing.is_none();

        let mut role = match existing {
            Some(role) if !creating => role,
            _ => Role::new(name.as_str()),
        };

        match request.permissions {
            Some(raw) => role.permissions = parse_permissions(&raw)?,
            None if creating => return Err(ValidationError::MissingPermissions.into()),
            None => {}
        }

        if let Some(ttl) = request.ttl {
            role.ttl = ttl.resolve("ttl")?;
        }

        if let Some(max_ttl) = request.max_ttl {
            role.max_ttl = max_ttl.resolve("max_ttl")?;
        }

        if !role.max_ttl.is_zero() && role.ttl > role.max_ttl {
            return Err(ValidationError::TtlExceedsMaxTtl.into());
        }

        self.storage
            .put(&role_key(&name), serde_json::to_vec(&role)?)
            .await?;

        debug!(role = %name, ?operation, "role written");

        Ok(role)
    }

    /// Read a role by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the entry is corrupt.
    pub async fn read(&self, name: &str) -> Result<Option<Role>, BackendError> {
        let Some(bytes) = self.storage.get(&role_key(name)).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Delete a role, ignoring case. Deleting an absent role succeeds.
    ///
    /// Credentials already issued for the role are left alone.
    ///
    /// # Errors
    ///
    /// Returns storage errors unchanged.
    pub async fn delete(&self, name: &str) -> Result<(), BackendError> {
        self.storage.delete(&role_key(name)).await?;

        debug!(role = name, "role deleted");

        Ok(())
    }

    /// Names of all roles, sorted.
    ///
    /// # Errors
    ///
    /// Returns storage errors unchanged.
    pub async fn list(&self) -> Result<Vec<String>, BackendError> {
        let mut names = self.storage.list(ROLE_PREFIX).await?;

        names.sort_unstable();

        Ok(names)
    }
}

fn role_key(name: &str) -> String {
    format!("{ROLE_PREFIX}{}", normalize_role_name(name))
}
