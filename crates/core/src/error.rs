use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The submitted credential did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A required server-side setting is absent. Never the caller's fault.
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
