//! Session token generation/validation and cookie helpers.
//!
//! A session token is an HS256-signed JWT with no user identity: its only
//! meaning is "this browser knew the site password". It expires after
//! [`SESSION_MAX_AGE_DAYS`] and travels in an HttpOnly cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use knitlog_core::access::{SESSION_COOKIE_NAME, SESSION_MAX_AGE_DAYS, SESSION_MAX_AGE_SECS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject claim shared by every session.
const SESSION_SUBJECT: &str = "shared";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Always [`SESSION_SUBJECT`].
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4), useful when tracing a session in logs.
    pub jti: String,
}

/// Generate a session token signed with `key`.
pub fn issue_session_token(key: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: SESSION_SUBJECT.to_string(),
        exp: now + chrono::Duration::days(SESSION_MAX_AGE_DAYS).num_seconds(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
}

/// Validate a session token's signature and expiry.
pub fn validate_session_token(
    token: &str,
    key: &str,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.sub = Some(SESSION_SUBJECT.to_string());
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// `Set-Cookie` value that stores `token` for the full session lifetime.
pub fn session_cookie(token: &str, secure: bool) -> String {
    build_cookie(token, SESSION_MAX_AGE_SECS, secure)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read a cookie value from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const KEY: &str = "test-secret-that-is-long-enough-for-hmac";

    #[test]
    fn test_issue_and_validate_session_token() {
        let token = issue_session_token(KEY).expect("token generation should succeed");
        let claims = validate_session_token(&token, KEY).expect("token validation should succeed");
        assert_eq!(claims.sub, SESSION_SUBJECT);
        assert_eq!(claims.exp - claims.iat, SESSION_MAX_AGE_SECS);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_token_signed_with_other_key_fails() {
        let token = issue_session_token(KEY).unwrap();
        assert!(validate_session_token(&token, "a-different-key").is_err());
    }

    #[test]
    fn test_expired_token_fails() {
        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: SESSION_SUBJECT.to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();

        assert!(validate_session_token(&token, KEY).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", false);
        assert!(cookie.starts_with("auth_token=abc;"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
        assert!(session_cookie("abc", true).ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_session_cookie(false).starts_with("auth_token=; Max-Age=0;"));
    }

    #[test]
    fn test_read_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; auth_token=xyz; lang=ja"));
        assert_eq!(read_cookie(&headers, "auth_token"), Some("xyz"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }
}
