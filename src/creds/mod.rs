//! Credential issuance.

mod issuer;
mod models;
pub mod naming;

pub use issuer::{CredentialIssuer, ROBOT_DESCRIPTION, robot_duration_days};
pub use models::*;
