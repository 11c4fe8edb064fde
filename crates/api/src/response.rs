//! Shared response bodies for API handlers.

use knitlog_core::types::DbId;
use serde::Serialize;

/// `{ "id": ... }` returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: DbId,
}

/// `{ "success": true }` returned by update, delete, and auth endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: SuccessResponse = SuccessResponse { success: true };
}
