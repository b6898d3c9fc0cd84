//! Registry connection profile.

mod errors;
mod models;
mod store;

pub use errors::ConfigError;
pub use models::{Config, ConfigRequest, ConfigView};
pub use store::{CONFIG_KEY, ConfigStore};
