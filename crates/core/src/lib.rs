//! Domain logic for the knitting project catalogue.
//!
//! Pure functions only: validation, normalization, and the credential check.
//! Nothing in this crate touches the database or the network.

pub mod access;
pub mod error;
pub mod project;
pub mod types;
