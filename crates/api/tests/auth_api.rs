//! HTTP-level tests for the shared-password login and the session gate.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{
    body_json, build_app_with_config, cookie_pair, post_json, post_json_auth, test_config,
    TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_sets_session_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/login", json!({ "password": TEST_PASSWORD })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=2592000"));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/login", json!({ "password": "knit-one" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_without_configured_password_is_configuration_error(pool: PgPool) {
    let mut config = test_config();
    config.auth.app_password = None;
    config.auth.session_secret = None;
    let app = build_app_with_config(pool, config);

    let response = post_json(app, "/api/auth/login", json!({ "password": "" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_missing_or_null_password_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [json!({}), json!({ "password": null })] {
        let response = post_json(app.clone(), "/api/auth/login", body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "body: {body}");
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_missing_password_without_configuration_is_500(pool: PgPool) {
    let mut config = test_config();
    config.auth.app_password = None;
    config.auth.session_secret = None;
    let app = build_app_with_config(pool, config);

    let response = post_json(app, "/api/auth/login", json!({})).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_type_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/login", json!({ "password": 42 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cookie_pair(&response), "auth_token=");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mutation_requires_session(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/projects",
        json!({ "title": "Socks", "yarn_color_count": 1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forged_session_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/projects",
        json!({ "title": "Socks", "yarn_color_count": 1 }),
        "auth_token=not-a-real-token",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_from_other_secret_is_rejected(pool: PgPool) {
    let mut other = test_config();
    other.auth.session_secret = Some("some-other-deployment".into());
    let cookie = common::login(build_app_with_config(pool.clone(), other)).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/projects",
        json!({ "title": "Socks", "yarn_color_count": 1 }),
        &cookie,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
