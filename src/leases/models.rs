//! Lease models.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::leases::LeaseDataError;

/// Platform-wide lease TTL of 32 days.
const DEFAULT_PLATFORM_TTL: Duration = Duration::from_secs(768 * 3600);

/// Internal data key holding the role name.
pub const ROLE_FIELD: &str = "role";

/// Internal data key holding the requested robot account name.
pub const ROBOT_ACCOUNT_NAME_FIELD: &str = "robot_account_name";

/// Lease TTLs the platform applies when a role leaves them at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDefaults {
    /// TTL for leases whose role sets none.
    pub default_lease_ttl: Duration,

    /// Maximum TTL for leases whose role sets none.
    pub max_lease_ttl: Duration,
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self {
            default_lease_ttl: DEFAULT_PLATFORM_TTL,
            max_lease_ttl: DEFAULT_PLATFORM_TTL,
        }
    }
}

/// TTL bounds attached to a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeasePolicy {
    /// Time until the lease must be renewed.
    pub ttl: Duration,

    /// Time after which the lease cannot be renewed further.
    pub max_ttl: Duration,
}

/// Fields the platform stores with a lease and hands back on renew/revoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalData {
    /// Role the credential was issued for.
    pub role: String,

    /// Robot account name as requested from the registry.
    pub robot_account_name: String,
}

impl InternalData {
    /// Convert into the platform's untyped representation.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        Map::from_iter([
            (ROLE_FIELD.to_string(), Value::String(self.role)),
            (
                ROBOT_ACCOUNT_NAME_FIELD.to_string(),
                Value::String(self.robot_account_name),
            ),
        ])
    }
}

/// Extract a string field from untyped lease data.
///
/// # Errors
///
/// Returns [`LeaseDataError::Missing`] when `field` is absent and
/// [`LeaseDataError::WrongType`] when it is not a string.
pub fn string_field<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, LeaseDataError> {
    data.get(field)
        .ok_or(LeaseDataError::Missing(field))?
        .as_str()
        .ok_or(LeaseDataError::WrongType(field))
}

/// A lease as tracked by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Lease {
    /// Opaque data returned to renew and revoke.
    pub internal: Map<String, Value>,

    /// Current TTL bounds.
    pub policy: LeasePolicy,
}
