//! Repository for the `projects` table.

use knitlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::project::{Project, ProjectFields, ProjectSummary, SummaryFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, completed_image_url, youtube_url, \
                       yarn_color_count, category, created_at, updated_at";

/// Same columns qualified with the `p` alias for joined queries.
const P_COLUMNS: &str = "p.id, p.title, p.description, p.completed_image_url, p.youtube_url, \
                         p.yarn_color_count, p.category, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &ProjectFields) -> Result<Project, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO projects
                (title, description, completed_image_url, youtube_url, yarn_color_count, category)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.completed_image_url)
            .bind(&input.youtube_url)
            .bind(input.yarn_color_count)
            .bind(&input.category)
            .fetch_one(executor)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List projects newest first, each with the `image_url` of its
    /// lowest-ordered completed image.
    ///
    /// Only that one child row is read per project (lateral join, `LIMIT 1`).
    pub async fn list_summaries(
        pool: &PgPool,
        filter: &SummaryFilter,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, thumb.image_url AS first_completed_image_url
             FROM projects p
             LEFT JOIN LATERAL (
                 SELECT ci.image_url
                 FROM completed_images ci
                 WHERE ci.project_id = p.id
                 ORDER BY ci.display_order ASC
                 LIMIT 1
             ) thumb ON TRUE
             WHERE ($1::TEXT IS NULL OR p.category = $1)
               AND (NOT $2::BOOLEAN
                    OR thumb.image_url IS NOT NULL
                    OR p.completed_image_url IS NOT NULL)
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(&filter.category)
            .bind(filter.with_photo)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every scalar field of a project. Last writer wins.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &ProjectFields,
    ) -> Result<Option<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE projects SET
                title = $2,
                description = $3,
                completed_image_url = $4,
                youtube_url = $5,
                yarn_color_count = $6,
                category = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.completed_image_url)
            .bind(&input.youtube_url)
            .bind(input.yarn_color_count)
            .bind(&input.category)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete a project by ID. Child rows go with it through
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
