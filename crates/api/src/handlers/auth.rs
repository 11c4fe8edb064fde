//! Handlers for the `/auth` resource (login, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use knitlog_core::access::check_credential;
use knitlog_core::error::CoreError;
use serde::Deserialize;

use crate::auth::session::{clear_session_cookie, issue_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::response::SuccessResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
///
/// A missing or null password is checked like an empty one, so it fails as
/// a wrong password rather than as a malformed body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/auth/login
///
/// Check the shared password and, on success, set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    input: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let auth = &state.config.auth;

    if let Err(err) = check_credential(
        auth.app_password.as_deref(),
        input.password.as_deref().unwrap_or_default(),
    ) {
        if matches!(err, CoreError::Unauthorized(_)) {
            let request_id = headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::warn!(request_id, "Login rejected: incorrect password");
        }
        return Err(err.into());
    }

    let key = auth.signing_key().ok_or_else(|| {
        AppError::Core(CoreError::Misconfigured("APP_PASSWORD is not set".into()))
    })?;
    let token = issue_session_token(key)
        .map_err(|e| AppError::InternalError(format!("Session token generation failed: {e}")))?;

    tracing::info!("Login succeeded, session issued");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token, auth.secure_cookie))]),
        Json(SuccessResponse::OK),
    ))
}

/// POST /api/auth/logout
///
/// Expire the session cookie. Always succeeds.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(
            SET_COOKIE,
            clear_session_cookie(state.config.auth.secure_cookie),
        )]),
        Json(SuccessResponse::OK),
    )
}
