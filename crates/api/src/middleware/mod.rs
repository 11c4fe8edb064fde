//! Request extractors that gate access.
//!
//! - [`auth::Authenticated`] -- requires a valid session cookie.

pub mod auth;
