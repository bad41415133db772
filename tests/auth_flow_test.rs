mod common;

use axum::http::StatusCode;
use time::{Duration, OffsetDateTime};

#[tokio::test]
async fn register_login_and_me() {
    let app = common::TestApp::new();

    let (status, body) = app.register("alice", "pw1", "Alice").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "alice");
    assert_eq!(body["name"], "Alice");
    assert!(body.get("password_hash").is_none());

    let (status, body) = app.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["id"], "alice");
    let token = body["access_token"].as_str().unwrap();

    let (status, me) = app.request("GET", "/api/v1/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], "alice");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = common::TestApp::new();
    app.register("alice", "pw1", "Alice").await;

    let (status, body) = app.login("alice", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let app = common::TestApp::new();

    let (status, _) = app.register("alice", "pw1", "Alice").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.register("alice", "pw2", "Other").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_registration_is_bad_request() {
    let app = common::TestApp::new();
    let (status, body) = app.register("not valid", "pw1", "Alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = common::TestApp::new();
    let (status, _) = app.request("GET", "/api/v1/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn corrupted_token_is_unauthorized() {
    let app = common::TestApp::new();
    let token = app.signed_in("alice").await;
    let corrupted = format!("{}x", &token[..token.len() - 5]);

    let (status, body) = app.request("GET", "/api/v1/me", Some(&corrupted), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = common::TestApp::new();
    app.register("alice", "pw1", "Alice").await;

    let stale = app
        .state
        .keys
        .issue_at("alice", None, OffsetDateTime::now_utc() - Duration::hours(1))
        .unwrap();
    let (status, body) = app.request("GET", "/api/v1/me", Some(&stale.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn token_for_unknown_user_is_unauthorized() {
    let app = common::TestApp::new();
    let ghost = app.state.keys.issue("ghost", None).unwrap();

    let (status, _) = app.request("GET", "/api/v1/me", Some(&ghost.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = common::TestApp::new();
    let (status, _) = app.request("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
