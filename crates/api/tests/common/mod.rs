#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pressroom_api::auth::jwt::{generate_access_token, JwtConfig};
use pressroom_api::config::{LogFormat, ServerConfig, StorageBackend};
use pressroom_api::router::build_app_router;
use pressroom_api::state::AppState;
use pressroom_core::service::{Actor, ContentService, ServiceOptions};
use pressroom_core::store::MemoryContentStore;

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage: StorageBackend::Memory,
        database: None,
        track_views: true,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses. The returned router is cheap to clone and every
/// clone shares the same store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let service = ContentService::new(
        Arc::new(MemoryContentStore::new()),
        ServiceOptions {
            track_views: config.track_views,
        },
    );

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
        pool: None,
    };

    build_app_router(state, &config)
}

/// A valid bearer token for a test editor.
pub fn editor_token() -> String {
    let actor = Actor {
        id: "editor-1".into(),
        name: "Test Editor".into(),
        email: Some("editor@example.com".into()),
    };
    generate_access_token(&actor, "editor", &test_config().jwt).unwrap()
}

/// Send a request through the router, optionally with a JSON body and token.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Anonymous GET.
pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

/// Authenticated POST with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body), Some(editor_token().as_str())).await
}

/// Authenticated PUT with a JSON body.
pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body), Some(editor_token().as_str())).await
}

/// Authenticated DELETE.
pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None, Some(editor_token().as_str())).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a record through the API and return its JSON representation.
pub async fn create_content(app: &Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/content", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["content"].clone()
}
