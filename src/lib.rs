//! Harbor robot accounts
//!
//! A secrets backend that issues short-lived Harbor robot accounts bound to
//! the lease lifecycle of the host secrets platform.

pub mod backend;
pub mod config;
pub mod context;
pub mod creds;
pub mod errors;
pub mod leases;
pub mod registry;
pub mod roles;
pub mod sensitive;
pub mod storage;

#[cfg(test)]
mod test;

pub use backend::Backend;
pub use context::RequestContext;
pub use errors::BackendError;
