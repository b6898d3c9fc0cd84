//! Issued credential models.

use serde::Serialize;

use crate::{
    leases::{InternalData, Lease, LeasePolicy},
    sensitive::Sensitive,
};

/// Secret type registered for issued robot accounts.
pub const ROBOT_ACCOUNT_SECRET_TYPE: &str = "robot_account";

/// Robot account data returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedCredential {
    /// Registry-assigned robot account id.
    #[serde(rename = "robot_account_id")]
    pub id: i64,

    /// Robot account name as reported by the registry.
    #[serde(rename = "robot_account_name")]
    pub name: String,

    /// Generated robot account secret.
    #[serde(rename = "robot_account_secret")]
    pub secret: Sensitive,

    /// Base64 of `name:secret`, usable as a basic auth token.
    #[serde(rename = "robot_account_auth_token")]
    pub auth_token: Sensitive,
}

/// Response of a `creds/{name}` request: caller data plus lease material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSecret {
    /// Always [`ROBOT_ACCOUNT_SECRET_TYPE`].
    pub secret_type: &'static str,

    /// Fields visible to the caller.
    pub data: IssuedCredential,

    /// Fields kept by the platform for renew and revoke.
    pub internal: InternalData,

    /// Initial lease TTLs.
    pub lease: LeasePolicy,
}

impl IssuedSecret {
    /// The lease record the platform would track for this secret.
    #[must_use]
    pub fn to_lease(&self) -> Lease {
        Lease {
            internal: self.internal.clone().into_map(),
            policy: self.lease,
        }
    }
}
