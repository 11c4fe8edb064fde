//! Shared-secret access gate.
//!
//! The whole site is guarded by one password configured at deployment. There
//! is no per-user identity: a successful check earns a session marker that is
//! valid for [`SESSION_MAX_AGE_DAYS`].

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

/// Name of the cookie carrying the session marker.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Session marker lifetime in days.
pub const SESSION_MAX_AGE_DAYS: i64 = 30;

/// Session marker lifetime in seconds, as used by the cookie `Max-Age`.
pub const SESSION_MAX_AGE_SECS: i64 = SESSION_MAX_AGE_DAYS * 24 * 60 * 60;

type HmacSha256 = Hmac<Sha256>;

/// Fixed message both sides are tagged over; only the key differs.
const CREDENTIAL_TAG_MESSAGE: &[u8] = b"knitlog-credential-check";

/// Check a submitted password against the configured one.
///
/// - `Misconfigured` when no password is configured (or it is empty).
/// - `Unauthorized` when the submitted password does not match.
///
/// The comparison is constant-time (HMAC tag verification).
pub fn check_credential(configured: Option<&str>, submitted: &str) -> Result<(), CoreError> {
    let configured = configured
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Misconfigured("APP_PASSWORD is not set".into()))?;

    let expected = tagger(configured.as_bytes())?.finalize().into_bytes();

    tagger(submitted.as_bytes())?
        .verify_slice(&expected)
        .map_err(|_| CoreError::Unauthorized("Incorrect password".into()))
}

/// An HMAC keyed with `key`, already fed the fixed message.
fn tagger(key: &[u8]) -> Result<HmacSha256, CoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CoreError::Internal(format!("HMAC init failed: {e}")))?;
    mac.update(CREDENTIAL_TAG_MESSAGE);
    Ok(mac)
}
