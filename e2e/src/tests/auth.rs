use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::{json, Value};
use stayone::{codes, ApiCode, Credentials, Error, FileSessionStore, SessionStore, StayClient};

use super::utils::{fail, ok, Harness};

fn credentials() -> Credentials {
    Credentials::new("host@stayone.example", "correct horse")
}

#[tokio::test]
async fn login_posts_credentials_and_sets_flag() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"email": "host@stayone.example", "password": "correct horse"}));
            then.status(200)
                .json_body(ok(json!({"nickname": "host", "role": "HOST"})));
        })
        .await;

    let h = Harness::new(&server);
    assert!(!h.client.is_logged_in());

    let profile: Value = h.client.login(&credentials()).await.unwrap().into_data();

    assert_eq!(profile["role"], "HOST");
    assert!(h.client.is_logged_in());
    login.assert_async().await;
}

#[tokio::test]
async fn unverified_email_error_is_left_to_the_caller() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(fail(401, codes::EMAIL_NOT_VERIFIED, "verify your email"));
        })
        .await;
    let reissue = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/token/reissue");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let h = Harness::new(&server);
    let err = h.client.login::<Value>(&credentials()).await.unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert_eq!(err.code(), Some(&ApiCode::Number(codes::EMAIL_NOT_VERIFIED)));
    assert!(!h.client.is_logged_in());
    assert!(h.hooks.routes().is_empty());
    assert!(h.hooks.notices().is_empty());
    reissue.assert_hits_async(0).await;
}

#[tokio::test]
async fn unverified_email_on_success_status_does_not_sign_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(json!({
                "status": 200,
                "code": codes::EMAIL_NOT_VERIFIED,
                "message": "verify your email",
                "data": null
            }));
        })
        .await;

    let h = Harness::new(&server);
    let resp = h.client.login::<Value>(&credentials()).await.unwrap();

    assert!(resp.has_code(&ApiCode::Number(codes::EMAIL_NOT_VERIFIED)));
    assert!(!h.client.is_logged_in());
}

#[tokio::test]
async fn logout_clears_flag_even_when_server_fails() {
    let server = MockServer::start_async().await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/logout");
            then.status(500).json_body(fail(500, 50000, "boom"));
        })
        .await;

    let h = Harness::new(&server);
    h.client.session().set_logged_in();

    let err = h.client.logout().await.unwrap_err();

    assert_eq!(err.status(), Some(stayone::StatusCode::INTERNAL_SERVER_ERROR));
    assert!(!h.client.is_logged_in());
    logout.assert_async().await;
    // A user-initiated logout does not navigate.
    assert!(h.hooks.routes().is_empty());
}

#[tokio::test]
async fn email_check_encodes_the_address() {
    let server = MockServer::start_async().await;
    let check = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/auth/email-check")
                .query_param("email", "new+guest@stayone.example");
            then.status(200).json_body(ok(json!({"available": true})));
        })
        .await;

    let h = Harness::new(&server);
    let data: Value = h
        .client
        .email_check("new+guest@stayone.example")
        .await
        .unwrap()
        .into_data();

    assert_eq!(data, json!({"available": true}));
    check.assert_async().await;
}

#[tokio::test]
async fn reissue_failure_is_returned_directly() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/token/reissue");
            then.status(401)
                .json_body(fail(401, codes::SESSION_INVALIDATED, "revoked"));
        })
        .await;

    let h = Harness::new(&server);
    let err = h.client.reissue().await.unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    // Calling reissue directly never triggers the forced logout path.
    assert!(h.hooks.routes().is_empty());
}

#[tokio::test]
async fn file_backed_flag_follows_login_and_logout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/logout");
            then.status(200).json_body(ok(Value::Null));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");
    let client = StayClient::builder()
        .base_url(server.base_url())
        .session_store(Arc::new(FileSessionStore::new(&path)))
        .build()
        .unwrap();

    client.login::<()>(&credentials()).await.unwrap();
    assert!(FileSessionStore::new(&path).is_logged_in());

    client.logout().await.unwrap();
    assert!(!path.exists());
}
