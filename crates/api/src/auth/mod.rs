//! Session markers issued by the shared-password access gate.
//!
//! - [`session`] -- signed session tokens and the cookie that carries them.

pub mod session;
