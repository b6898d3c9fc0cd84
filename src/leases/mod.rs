//! Lease callbacks for issued robot accounts.

mod errors;
mod manager;
mod models;

pub use errors::LeaseDataError;
pub use manager::LeaseManager;
pub use models::*;
