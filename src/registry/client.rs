//! Registry client seams.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    config::Config,
    errors::BackendError,
    registry::{RegistryError, RobotCreate, RobotCreated},
};

#[automock]
#[async_trait]
/// Robot account operations consumed from the registry.
pub trait RegistryClient: Send + Sync {
    /// Create a robot account and return its generated secret.
    async fn create_robot_account(
        &self,
        robot: &RobotCreate,
    ) -> Result<RobotCreated, RegistryError>;

    /// Delete the robot account that was created as `name`.
    async fn delete_robot_account_by_name(&self, name: &str) -> Result<(), RegistryError>;
}

#[automock]
#[async_trait]
/// Builds authenticated registry clients from a connection profile.
pub trait ClientFactory: Send + Sync {
    /// Construct a client for `config`.
    async fn build(&self, config: &Config) -> Result<Arc<dyn RegistryClient>, BackendError>;
}
