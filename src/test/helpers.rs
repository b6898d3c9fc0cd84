//! Test Helpers

use crate::{
    config::Config,
    roles::{DurationInput, RoleRequest},
    sensitive::Sensitive,
};

/// Pull access to the `public` project.
pub(crate) const TEST_PERMISSIONS: &str = r#"[{"kind":"project","namespace":"public","access":[{"resource":"repository","action":"pull"}]}]"#;

pub(crate) fn role_request(ttl: u64, max_ttl: u64) -> RoleRequest {
    RoleRequest {
        ttl: Some(DurationInput::Text(ttl.to_string())),
        max_ttl: Some(DurationInput::Text(max_ttl.to_string())),
        permissions: Some(TEST_PERMISSIONS.to_string()),
    }
}

pub(crate) fn test_config() -> Config {
    Config {
        url: "https://harbor.example.com".to_string(),
        username: "admin".to_string(),
        password: Sensitive::new("Harbor12345"),
    }
}
