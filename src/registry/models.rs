//! Registry wire models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::sensitive::Sensitive;

/// Robot accounts created at system level may span several projects.
pub const SYSTEM_LEVEL: &str = "system";

/// A single permission grant attached to a robot account.
///
/// Keys the registry adds beyond these are carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotPermission {
    /// Grant scope, e.g. `project`.
    pub kind: String,

    /// Namespace the grant applies to, e.g. a project name.
    pub namespace: String,

    /// Allowed actions.
    #[serde(default)]
    pub access: Vec<Access>,

    /// Unrecognised keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `resource`/`action` pair inside a [`RobotPermission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    /// Resource type, e.g. `repository`.
    pub resource: String,

    /// Action on the resource, e.g. `pull`.
    pub action: String,

    /// `allow` or `deny`; the registry defaults to `allow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    /// Unrecognised keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Robot account creation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotCreate {
    /// Requested name, without the registry prefix.
    pub name: String,

    /// Free-form description shown in the registry UI.
    pub description: String,

    /// Create the account disabled.
    pub disable: bool,

    /// Validity in whole days.
    pub duration: i64,

    /// Account scope; see [`SYSTEM_LEVEL`].
    pub level: String,

    /// Grants for the new account.
    pub permissions: Vec<RobotPermission>,
}

/// Registry response to a successful creation.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotCreated {
    /// Registry-assigned id.
    pub id: i64,

    /// Name as stored by the registry, usually with a `robot$` prefix.
    pub name: String,

    /// Generated secret, only returned at creation.
    pub secret: Sensitive,
}

/// Entry of a robot account listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotSummary {
    /// Registry-assigned id.
    pub id: i64,

    /// Prefixed name.
    pub name: String,
}

impl RobotSummary {
    /// Whether this entry is the robot created as `name`.
    ///
    /// The registry reports names with a configurable prefix ending in `$`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name == name
            || self
                .name
                .rsplit_once('$')
                .is_some_and(|(_, unprefixed)| unprefixed == name)
    }
}
