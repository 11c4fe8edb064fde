#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use knitlog_api::config::{AuthConfig, ServerConfig, DEFAULT_MAX_BODY_BYTES};
use knitlog_api::router::build_app_router;
use knitlog_api::state::AppState;
use knitlog_core::project::ChildWritePolicy;
use sqlx::PgPool;
use tower::ServiceExt;

/// Shared password configured in [`test_config`].
pub const TEST_PASSWORD: &str = "purl-two-together";

/// Build a test `ServerConfig` with safe defaults and a known password.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        db_max_connections: 5,
        child_write_policy: ChildWritePolicy::BestEffort,
        auth: AuthConfig {
            app_password: Some(TEST_PASSWORD.to_string()),
            session_secret: Some("test-session-secret".to_string()),
            secure_cookie: false,
        },
    }
}

/// Build the full application router on top of `pool` using [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_config(pool, test_config())
}

/// Build the full application router with a custom configuration.
pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let config = Arc::new(config);
    let state = AppState::new(pool, Arc::clone(&config));
    build_app_router(state, &config)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Send a request through the router.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(cookie)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(cookie)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(cookie)).await
}

/// The `name=value` pair from a response's `Set-Cookie` header.
pub fn cookie_pair(response: &Response<Body>) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

/// Log in with [`TEST_PASSWORD`] and return the cookie to send back.
pub async fn login(app: Router) -> String {
    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), 200);
    cookie_pair(&response)
}

/// Create a project through the API and return its id.
pub async fn create_project(app: Router, cookie: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(app, "/api/projects", body, cookie).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}
