//! Registry errors.

use thiserror::Error;

/// Errors that can occur when talking to the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An HTTP transport or decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with a non-2xx status.
    #[error("unexpected response from registry ({status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,

        /// Response body, as text.
        body: String,
    },

    /// No robot account matched the requested name.
    #[error("robot account not found: {0}")]
    RobotNotFound(String),
}
