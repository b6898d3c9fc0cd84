//! Role models.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    leases::{LeasePolicy, PlatformDefaults},
    registry::RobotPermission,
    roles::{ValidationError, duration},
};

pub use duration::DurationInput;

/// A named policy for issued robot accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name.
    pub name: String,

    /// Lease TTL; zero means the platform default.
    #[serde(with = "duration::seconds")]
    pub ttl: Duration,

    /// Lease maximum TTL; zero means the platform default.
    #[serde(with = "duration::seconds")]
    pub max_ttl: Duration,

    /// Grants copied onto every robot account issued for this role.
    pub permissions: Vec<RobotPermission>,
}

impl Role {
    /// Role with no grants and platform-default TTLs.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ttl: Duration::ZERO,
            max_ttl: Duration::ZERO,
            permissions: Vec::new(),
        }
    }

    /// Lease policy for credentials of this role, falling back to `defaults`
    /// for zero values.
    #[must_use]
    pub fn lease_policy(&self, defaults: &PlatformDefaults) -> LeasePolicy {
        LeasePolicy {
            ttl: non_zero_or(self.ttl, defaults.default_lease_ttl),
            max_ttl: non_zero_or(self.max_ttl, defaults.max_lease_ttl),
        }
    }
}

fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() { fallback } else { value }
}

/// Whether a role write replaces or amends the stored definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    /// Replace the role; `permissions` is required.
    Create,

    /// Amend the role, keeping fields that are not supplied. Behaves like
    /// `Create` when the role does not exist yet.
    Update,
}

/// Body of a `roles/{name}` write.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRequest {
    /// Lease TTL as seconds or a duration string.
    pub ttl: Option<DurationInput>,

    /// Lease maximum TTL as seconds or a duration string.
    pub max_ttl: Option<DurationInput>,

    /// JSON array of permission grants, as a string.
    pub permissions: Option<String>,
}

/// Body of a `roles/{name}` read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleView {
    /// Role name.
    pub name: String,

    /// Lease TTL in seconds.
    pub ttl: u64,

    /// Lease maximum TTL in seconds.
    pub max_ttl: u64,

    /// Permission grants as compact JSON.
    pub permissions: String,
}

impl TryFrom<&Role> for RoleView {
    type Error = serde_json::Error;

    fn try_from(role: &Role) -> Result<Self, Self::Error> {
        Ok(Self {
            name: role.name.clone(),
            ttl: role.ttl.as_secs(),
            max_ttl: role.max_ttl.as_secs(),
            permissions: serde_json::to_string(&role.permissions)?,
        })
    }
}

/// Parse a JSON permission list into the registry schema.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPermissions`] when `raw` is not a JSON
/// array of permission grants.
pub fn parse_permissions(raw: &str) -> Result<Vec<RobotPermission>, ValidationError> {
    serde_json::from_str(raw).map_err(ValidationError::InvalidPermissions)
}

/// Canonical form of a role name used for storage and lookup.
#[must_use]
pub fn normalize_role_name(name: &str) -> String {
    name.to_lowercase()
}

/// Check `name` against `\w([\w.-]*\w)?`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidRoleName`] otherwise.
pub fn validate_role_name(name: &str) -> Result<(), ValidationError> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let valid = name.starts_with(is_word)
        && name.ends_with(is_word)
        && name.chars().all(|c| is_word(c) || c == '.' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidRoleName(name.to_string()))
    }
}
