//! Harbor v2 REST client for robot account management.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::{
    config::{Config, ConfigError},
    errors::BackendError,
    registry::{
        ClientFactory, RegistryClient, RegistryError, RobotCreate, RobotCreated, RobotSummary,
    },
    sensitive::Sensitive,
};

/// API prefix appended to the configured registry URL.
pub const API_PATH: &str = "/api/v2.0";

/// Page size used when looking robots up by name.
const PAGE_SIZE: &str = "100";

/// HTTP client for the Harbor robot account API.
#[derive(Debug, Clone)]
pub struct HarborClient {
    api_url: String,
    username: String,
    password: Sensitive,
    http: Client,
}

impl HarborClient {
    /// Create a client from a complete connection profile.
    ///
    /// No request is sent; credentials are checked on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a field is empty or the URL does not
    /// parse, and a remote error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        config.ensure_complete()?;

        let api_url = format!("{}{API_PATH}", config.url.trim_end_matches('/'));

        Url::parse(&api_url).map_err(|error| ConfigError::InvalidUrl(error.to_string()))?;

        let http = Client::builder().build().map_err(|error| {
            BackendError::remote("error building registry client", error.into())
        })?;

        Ok(Self {
            api_url,
            username: config.username.clone(),
            password: config.password.clone(),
            http,
        })
    }

    /// Base URL of the versioned API.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn find_robot(&self, name: &str) -> Result<RobotSummary, RegistryError> {
        let url = format!("{}/robots", self.api_url);
        let query = format!("name={name}");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(self.password.expose()))
            .query(&[("q", query.as_str()), ("page_size", PAGE_SIZE)])
            .send()
            .await?;

        let robots: Vec<RobotSummary> = ensure_success(response).await?.json().await?;

        robots
            .into_iter()
            .find(|robot| robot.matches(name))
            .ok_or_else(|| RegistryError::RobotNotFound(name.to_string()))
    }
}

#[async_trait]
impl RegistryClient for HarborClient {
    async fn create_robot_account(
        &self,
        robot: &RobotCreate,
    ) -> Result<RobotCreated, RegistryError> {
        let url = format!("{}/robots", self.api_url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose()))
            .json(robot)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn delete_robot_account_by_name(&self, name: &str) -> Result<(), RegistryError> {
        let robot = self.find_robot(name).await?;

        debug!(id = robot.id, name = %robot.name, "deleting robot account");

        let url = format!("{}/robots/{}", self.api_url, robot.id);

        let response = self
            .http
            .delete(&url)
            .basic_auth(&self.username, Some(self.password.expose()))
            .send()
            .await?;

        ensure_success(response).await?;

        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, RegistryError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    Err(RegistryError::UnexpectedResponse { status, body })
}

/// Builds [`HarborClient`]s for the client cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarborClientFactory;

#[async_trait]
impl ClientFactory for HarborClientFactory {
    async fn build(&self, config: &Config) -> Result<Arc<dyn RegistryClient>, BackendError> {
        Ok(Arc::new(HarborClient::new(config)?))
    }
}
