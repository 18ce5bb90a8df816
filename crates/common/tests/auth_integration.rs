//! Integration tests for the auth module
//!
//! Runs the password grant and token cache against a local identity provider
//! served by wiremock.

use std::sync::Arc;

use glide_common::auth::{
    GrantError, PasswordGrantClient, PasswordGrantConfig, TokenCache, TokenSource,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn grant_client(server: &MockServer) -> PasswordGrantClient {
    PasswordGrantClient::new(PasswordGrantConfig::for_service(&server.uri()), http_client())
}

/// Validates the exact shape of the password grant request.
///
/// # Test Steps
/// 1. Mount a token endpoint that only matches the fly client credentials,
///    the password grant type and the user credentials
/// 2. Perform the exchange
/// 3. Verify the returned token and its expiry
#[tokio::test]
async fn test_password_grant_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .and(header("authorization", "Basic Zmx5OlpteDU="))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=s3cret"))
        .and(body_string_contains("scope=openid+profile+email+federated%3Aid+groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = grant_client(&server).password_grant("admin", "s3cret").await.unwrap();

    assert_eq!(token.access_token, "abc123");
    assert_eq!(token.authorization_header(), "Bearer abc123");
    assert!(token.is_valid());
    let remaining = token.seconds_until_expiry().unwrap();
    assert!(remaining > 3500 && remaining <= 3600);
}

/// Validates that a rejected grant surfaces the provider's OAuth error.
#[tokio::test]
async fn test_password_grant_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "invalid username and password"
        })))
        .mount(&server)
        .await;

    let err = grant_client(&server).password_grant("admin", "wrong").await.unwrap_err();

    match err {
        GrantError::Rejected { status, error, .. } => {
            assert_eq!(status, 401);
            assert_eq!(error.unwrap().error, "invalid_grant");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

/// Validates that a non-JSON error body is kept verbatim.
#[tokio::test]
async fn test_password_grant_rejected_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = grant_client(&server).password_grant("admin", "pw").await.unwrap_err();

    assert!(matches!(
        err,
        GrantError::Rejected { status: 500, error: None, ref body } if body == "boom"
    ));
}

/// Validates that a success response without a token is an error.
#[tokio::test]
async fn test_password_grant_missing_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "bearer" })))
        .mount(&server)
        .await;

    let err = grant_client(&server).password_grant("admin", "pw").await.unwrap_err();
    assert!(matches!(err, GrantError::MissingAccessToken));
}

/// Validates that an unreachable provider is a request failure.
#[tokio::test]
async fn test_password_grant_unreachable() {
    let config = PasswordGrantConfig::for_service("http://127.0.0.1:1");
    let client = PasswordGrantClient::new(config, http_client());

    let err = client.password_grant("admin", "pw").await.unwrap_err();
    assert!(matches!(err, GrantError::RequestFailed(_)));
}

/// Validates that the cache performs exactly one exchange for repeated calls.
///
/// # Test Steps
/// 1. Mount a token endpoint expected to be hit once
/// 2. Ask the cache for a token several times through the trait object
/// 3. Verify every call returns the same token
#[tokio::test]
async fn test_cache_exchanges_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cached",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = TokenCache::new(grant_client(&server), "admin", "pw");
    let source: Arc<dyn TokenSource> = Arc::new(cache);

    for _ in 0..3 {
        let token = source.token().await.unwrap();
        assert_eq!(token.access_token, "cached");
    }
}

/// Validates that a token issued inside the expiry margin is never reused.
#[tokio::test]
async fn test_cache_refreshes_short_lived_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&server)
        .await;

    let cache = TokenCache::new(grant_client(&server), "admin", "pw");
    cache.token().await.unwrap();
    cache.token().await.unwrap();

    assert_eq!(cache.exchange_count(), 2);
}
