//! Lease data errors.

use thiserror::Error;

/// Internal lease data that this backend cannot interpret.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaseDataError {
    /// A required field is absent.
    #[error("{0} is missing on the lease")]
    Missing(&'static str),

    /// A field is present but not a string.
    #[error("unable to convert {0} on the lease")]
    WrongType(&'static str),
}
