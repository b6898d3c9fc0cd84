//! Role validation errors.

use thiserror::Error;

/// Malformed role input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A create carried no `permissions`.
    #[error("missing permissions in role")]
    MissingPermissions,

    /// `permissions` is not a JSON array of grants.
    #[error("permissions must be a JSON array of robot permission grants")]
    InvalidPermissions(#[source] serde_json::Error),

    /// A TTL field could not be parsed or was negative.
    #[error("invalid duration for {field}: {value:?}")]
    InvalidDuration {
        /// Field the value was supplied for.
        field: &'static str,

        /// Offending input.
        value: String,
    },

    /// `ttl` is greater than a non-zero `max_ttl`.
    #[error("ttl cannot be greater than max_ttl")]
    TtlExceedsMaxTtl,

    /// The role name does not match `\w([\w.-]*\w)?`.
    #[error("invalid role name: {0:?}")]
    InvalidRoleName(String),
}
