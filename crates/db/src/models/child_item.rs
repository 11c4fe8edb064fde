//! Child items attached to a project: pattern assets and completed photos.

use knitlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The two child collections. Both share one row shape and differ only in
/// the table they live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// Rows of the `patterns` table.
    Pattern,
    /// Rows of the `completed_images` table.
    CompletedImage,
}

impl ChildKind {
    pub fn table(self) -> &'static str {
        match self {
            ChildKind::Pattern => "patterns",
            ChildKind::CompletedImage => "completed_images",
        }
    }

    /// Singular name for logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ChildKind::Pattern => "pattern",
            ChildKind::CompletedImage => "completed_image",
        }
    }
}

/// A row from `patterns` or `completed_images`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChildItem {
    pub id: DbId,
    pub project_id: DbId,
    pub image_url: String,
    pub display_order: i32,
    pub created_at: Timestamp,
}
