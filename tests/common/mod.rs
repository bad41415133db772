//! Shared helpers for HTTP-level tests against in-memory stores.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tasklist::{app::build_app, state::AppState};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::fake();
        let app = build_app(state.clone());
        Self { app, state }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn register(&self, id: &str, password: &str, name: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "id": id, "password": password, "name": name })),
        )
        .await
    }

    pub async fn login(&self, id: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "id": id, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning the access token.
    pub async fn signed_in(&self, id: &str) -> String {
        let (status, _) = self.register(id, "pw1", id).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(id, "pw1").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }
}
