//! Session-cookie extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use knitlog_core::access::SESSION_COOKIE_NAME;
use knitlog_core::error::CoreError;

use crate::auth::session::{read_cookie, validate_session_token};
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carries a valid session marker.
///
/// Add it as a parameter to any handler that mutates data:
///
/// ```ignore
/// async fn my_handler(_auth: Authenticated) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Token id of the presented session.
    pub session_id: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = state.config.auth.signing_key().ok_or_else(|| {
            AppError::Core(CoreError::Misconfigured("APP_PASSWORD is not set".into()))
        })?;

        let token = read_cookie(&parts.headers, SESSION_COOKIE_NAME)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Login required".into())))?;

        let claims = validate_session_token(token, key).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Session is invalid or expired".into(),
            ))
        })?;

        Ok(Authenticated {
            session_id: claims.jti,
        })
    }
}
