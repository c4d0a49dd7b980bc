//! Shared helpers for the HTTP-level tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use retail_api::{
    config::{AuthConfig, LogFormat, LoggingConfig, ServerConfig, ServiceConfig, StorageConfig},
    db, server, AppContext,
};
use serde_json::Value;
use std::path::PathBuf;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:8081".to_string()],
        },
        storage: StorageConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        },
        authentication: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
        },
    }
}

/// Router over a fresh in-memory database, plus its context
pub async fn test_app() -> (Router, AppContext) {
    let pool = db::create_memory_pool().await.unwrap();
    let ctx = AppContext::from_pool(test_config(), pool).await.unwrap();
    (server::build_router(ctx.clone()), ctx)
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let authorization = token.map(|t| format!("Bearer {}", t));
    send_raw(app, method, uri, authorization.as_deref(), body).await
}

/// Like `send`, with the Authorization header value given verbatim
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Register an account and return its token
pub async fn register(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": password,
            "name": "Test",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    body["token"].as_str().unwrap().to_string()
}
