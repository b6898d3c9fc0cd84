//! Config errors.

use thiserror::Error;

/// Missing or incomplete connection profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No profile has been written yet.
    #[error("registry connection is not configured")]
    NotConfigured,

    /// `username` is empty.
    #[error("client username was not defined")]
    MissingUsername,

    /// `password` is empty.
    #[error("client password was not defined")]
    MissingPassword,

    /// `url` is empty.
    #[error("client URL was not defined")]
    MissingUrl,

    /// The URL could not be parsed.
    #[error("client URL is not valid: {0}")]
    InvalidUrl(String),
}
