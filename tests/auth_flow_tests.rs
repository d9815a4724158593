//! Integration tests for the auth service around its local behavior:
//! validation, session files, and failure classification. Provider
//! round-trips are exercised against an unroutable endpoint only.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use quotarr::clients::auth::AuthClient;
use quotarr::services::{AuthError, AuthService, RestAuthService, RetryPolicy};

fn service_with_session_path(session_path: std::path::PathBuf) -> RestAuthService {
    // 127.0.0.1:9 is discard/unbound; connections fail fast.
    let client = Arc::new(AuthClient::new("http://127.0.0.1:9/auth/v1", "test-key"));
    let (event_bus, _) = broadcast::channel(8);

    RestAuthService::new(
        client,
        RetryPolicy::new(1, Duration::ZERO),
        session_path,
        event_bus,
    )
}

fn temp_session_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("quotarr-session-{}.json", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn sign_in_rejects_malformed_email_before_any_network_call() {
    let service = service_with_session_path(temp_session_path());

    let err = service.sign_in("not-an-email", "password").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn sign_in_rejects_empty_password() {
    let service = service_with_session_path(temp_session_path());

    let err = service
        .sign_in("homer@springfield.example", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn sign_up_rejects_short_password() {
    let service = service_with_session_path(temp_session_path());

    let err = service
        .sign_up("homer@springfield.example", "abc", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn current_user_without_session_is_none() {
    let service = service_with_session_path(temp_session_path());

    let user = service.current_user().await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn sign_out_without_session_is_a_noop() {
    let path = temp_session_path();
    let service = service_with_session_path(path.clone());

    service.sign_out().await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn unreachable_provider_maps_to_transient_error() {
    let service = service_with_session_path(temp_session_path());

    let err = service
        .sign_in("homer@springfield.example", "password")
        .await
        .unwrap_err();

    assert!(err.is_transient(), "expected transient error, got: {err}");
}
