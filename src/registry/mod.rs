//! Remote registry access.

mod cache;
mod client;
mod errors;
pub mod harbor;
mod models;

pub use cache::ClientCache;
pub use client::{ClientFactory, MockClientFactory, MockRegistryClient, RegistryClient};
pub use errors::RegistryError;
pub use harbor::{HarborClient, HarborClientFactory};
pub use models::*;
