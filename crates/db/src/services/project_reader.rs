//! Read-side aggregation for listing and detail screens.
//!
//! Store failures never propagate out of this module. They are logged and
//! turned into an empty listing or a missing project, so a page can always
//! render.

use knitlog_core::types::DbId;

use crate::models::child_item::ChildKind;
use crate::models::project::{ProjectDetail, ProjectSummary, SummaryFilter};
use crate::repositories::{ChildItemRepo, ProjectRepo};
use crate::DbPool;

/// Assembles projects with their child collections.
#[derive(Clone)]
pub struct ProjectReader {
    pool: DbPool,
}

impl ProjectReader {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Projects newest first, each with its first completed photo.
    ///
    /// Returns an empty list if the store fails.
    pub async fn list_summaries(&self, filter: &SummaryFilter) -> Vec<ProjectSummary> {
        match ProjectRepo::list_summaries(&self.pool, filter).await {
            Ok(summaries) => summaries,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list project summaries");
                Vec::new()
            }
        }
    }

    /// A project with its patterns and completed images in display order.
    ///
    /// Returns `None` if the project does not exist or the store fails.
    pub async fn get_detail(&self, id: DbId) -> Option<ProjectDetail> {
        match self.fetch_detail(id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::error!(project_id = id, error = %e, "Failed to fetch project detail");
                None
            }
        }
    }

    async fn fetch_detail(&self, id: DbId) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = ProjectRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };

        let patterns = ChildItemRepo::list_for_project(&self.pool, ChildKind::Pattern, id).await?;
        let completed_images =
            ChildItemRepo::list_for_project(&self.pool, ChildKind::CompletedImage, id).await?;

        Ok(Some(ProjectDetail {
            project,
            patterns,
            completed_images,
        }))
    }
}
