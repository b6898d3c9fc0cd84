//! End-to-end lifecycle against a stubbed Harbor server.
//!
//! Configures the backend, defines a role, issues a robot account, revokes it
//! and finally renews a stale lease after the role has been deleted.

use std::{sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};
use testresult::TestResult;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{basic_auth, method, path, path_regex, query_param},
};

use harbor_robots::{
    Backend, BackendError, RequestContext,
    config::ConfigRequest,
    leases::PlatformDefaults,
    roles::{DurationInput, RoleRequest, WriteOperation},
    sensitive::Sensitive,
    storage::MemoryStorage,
};

const PERMISSIONS: &str = r#"[{"namespace":"public","access":[{"action":"pull","resource":"repository"}],"kind":"project"}]"#;

fn echo_created(request: &Request) -> ResponseTemplate {
    let name = request
        .body_json::<Value>()
        .ok()
        .and_then(|body| body.get("name").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();

    ResponseTemplate::new(201).set_body_json(json!({
        "id": 11,
        "name": format!("robot${name}"),
        "secret": "generated-secret"
    }))
}

async fn configured_backend(server: &MockServer) -> Result<Backend, BackendError> {
    let backend = Backend::new(Arc::new(MemoryStorage::new()), PlatformDefaults::default());

    backend
        .write_config(ConfigRequest {
            url: Some(server.uri()),
            username: Some("admin".to_string()),
            password: Some(Sensitive::new("Harbor12345")),
        })
        .await?;

    Ok(backend)
}

#[tokio::test]
async fn issue_revoke_renew_lifecycle() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2.0/robots"))
        .and(basic_auth("admin", "Harbor12345"))
        .respond_with(echo_created)
        .expect(1)
        .mount(&server)
        .await;

    let backend = configured_backend(&server).await?;

    backend
        .write_role(
            "r1",
            WriteOperation::Create,
            RoleRequest {
                ttl: Some(DurationInput::Seconds(30.0)),
                max_ttl: Some(DurationInput::Seconds(60.0)),
                permissions: Some(PERMISSIONS.to_string()),
            },
        )
        .await?;

    let secret = backend.read_creds(&RequestContext::new(), "r1").await?;
    let requested = secret.internal.robot_account_name.clone();

    assert!(requested.starts_with("vault.r1."), "unexpected name {requested}");
    assert_eq!(secret.data.name, format!("robot${requested}"));
    assert_eq!(
        BASE64.decode(secret.data.auth_token.expose())?,
        format!("robot${requested}:generated-secret").into_bytes()
    );
    assert_eq!(secret.lease.ttl, Duration::from_secs(30));
    assert_eq!(secret.lease.max_ttl, Duration::from_secs(60));

    let data = serde_json::to_value(&secret.data)?;

    assert_eq!(data.get("robot_account_id"), Some(&json!(11)));
    assert_eq!(data.get("robot_account_secret"), Some(&json!("generated-secret")));

    let lease = secret.to_lease();

    Mock::given(method("GET"))
        .and(path("/api/v2.0/robots"))
        .and(query_param("q", format!("name={requested}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 11, "name": format!("robot${requested}") }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2.0/robots/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    backend.revoke(&RequestContext::new(), &lease.internal).await?;

    backend.delete_role("r1").await?;

    let renewed = backend.renew(&RequestContext::new(), &lease.internal).await;

    assert!(
        matches!(&renewed, Err(BackendError::RoleNotFound(name)) if name == "r1"),
        "expected RoleNotFound, got {renewed:?}"
    );
    assert_eq!(lease.policy.ttl, Duration::from_secs(30));
    assert_eq!(lease.policy.max_ttl, Duration::from_secs(60));

    Ok(())
}

#[tokio::test]
async fn second_revoke_fails_without_a_second_delete() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2.0/robots"))
        .respond_with(echo_created)
        .mount(&server)
        .await;

    let backend = configured_backend(&server).await?;

    backend
        .write_role(
            "r1",
            WriteOperation::Create,
            RoleRequest {
                permissions: Some(PERMISSIONS.to_string()),
                ..RoleRequest::default()
            },
        )
        .await?;

    let lease = backend.read_creds(&RequestContext::new(), "r1").await?.to_lease();
    let requested = lease
        .internal
        .get("robot_account_name")
        .cloned()
        .ok_or("lease has no robot account name")?;

    Mock::given(method("GET"))
        .and(path("/api/v2.0/robots"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 11, "name": requested }])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2.0/robots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v2\.0/robots/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    backend.revoke(&RequestContext::new(), &lease.internal).await?;

    let again = backend.revoke(&RequestContext::new(), &lease.internal).await;

    assert!(
        matches!(again, Err(BackendError::Remote { .. })),
        "expected remote error, got {again:?}"
    );

    Ok(())
}

#[tokio::test]
async fn config_read_hides_password() -> TestResult {
    let server = MockServer::start().await;
    let backend = configured_backend(&server).await?;

    let view = serde_json::to_value(backend.read_config().await?)?;

    assert_eq!(view, json!({ "url": server.uri(), "username": "admin" }));

    Ok(())
}

#[tokio::test]
async fn listing_tracks_role_deletes() -> TestResult {
    let server = MockServer::start().await;
    let backend = configured_backend(&server).await?;

    for index in 0..10 {
        backend
            .write_role(
                &format!("role-{index}"),
                WriteOperation::Create,
                RoleRequest {
                    permissions: Some(PERMISSIONS.to_string()),
                    ..RoleRequest::default()
                },
            )
            .await?;
    }

    assert_eq!(backend.list_roles().await?.len(), 10);

    backend.delete_role("role-3").await?;

    let names = backend.list_roles().await?;

    assert_eq!(names.len(), 9);
    assert!(!names.iter().any(|name| name == "role-3"));

    Ok(())
}

#[tokio::test]
async fn role_written_in_mixed_case_issues_credentials() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2.0/robots"))
        .respond_with(echo_created)
        .expect(1)
        .mount(&server)
        .await;

    let backend = configured_backend(&server).await?;

    backend
        .write_role(
            "CI-Bot",
            WriteOperation::Create,
            RoleRequest {
                permissions: Some("[]".to_string()),
                ..RoleRequest::default()
            },
        )
        .await?;

    assert_eq!(backend.list_roles().await?, ["ci-bot"]);

    let secret = backend.read_creds(&RequestContext::new(), "CI-Bot").await?;

    assert!(
        secret.internal.robot_account_name.starts_with("vault.ci-bot."),
        "unexpected name {}",
        secret.internal.robot_account_name
    );

    backend.delete_role("CI-Bot").await?;

    assert!(backend.list_roles().await?.is_empty(), "mixed-case delete left the role behind");

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancellation_aborts_a_pending_create() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2.0/robots"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 1, "name": "robot$late", "secret": "s" }))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let backend = configured_backend(&server).await?;

    backend
        .write_role(
            "r1",
            WriteOperation::Create,
            RoleRequest {
                permissions: Some(PERMISSIONS.to_string()),
                ..RoleRequest::default()
            },
        )
        .await?;

    let token = CancellationToken::new();
    let ctx = RequestContext::new().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        loop {
            let received = server.received_requests().await.unwrap_or_default();

            if received.iter().any(|request| request.method.as_str() == "POST") {
                break;
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        token.cancel();

        server
    });

    let result =
        tokio::time::timeout(Duration::from_secs(10), backend.read_creds(&ctx, "r1")).await?;

    assert!(
        matches!(result, Err(BackendError::Cancelled)),
        "expected Cancelled, got {result:?}"
    );

    canceller.await?;

    Ok(())
}
