//! Role definitions.

pub mod duration;
mod errors;
mod models;
mod store;

pub use errors::ValidationError;
pub use models::*;
pub use store::{ROLE_PREFIX, RoleStore};
