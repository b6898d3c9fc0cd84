//! Config models.

use serde::{Deserialize, Serialize};

use crate::{config::ConfigError, sensitive::Sensitive};

/// Connection profile for the remote registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Registry base URL, e.g. `https://harbor.example.com`.
    pub url: String,

    /// Administrative account used to manage robot accounts.
    pub username: String,

    /// Password for `username`.
    pub password: Sensitive,
}

impl Config {
    /// Check that every field needed to build a client is present.
    ///
    /// # Errors
    ///
    /// Returns the first missing field as a [`ConfigError`].
    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }

        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }

        if self.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        Ok(())
    }

    /// Apply a partial write on top of the current profile.
    #[must_use]
    pub fn merged(mut self, request: ConfigRequest) -> Self {
        if let Some(url) = request.url {
            self.url = url;
        }

        if let Some(username) = request.username {
            self.username = username;
        }

        if let Some(password) = request.password {
            self.password = password;
        }

        self
    }
}

/// Body of a `config` write. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigRequest {
    /// Registry base URL.
    pub url: Option<String>,

    /// Administrative username.
    pub username: Option<String>,

    /// Administrative password.
    pub password: Option<Sensitive>,
}

/// Body of a `config` read. The password is never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigView {
    /// Registry base URL.
    pub url: String,

    /// Administrative username.
    pub username: String,
}

impl From<&Config> for ConfigView {
    fn from(config: &Config) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username.clone(),
        }
    }
}
