//! Repository for the `patterns` and `completed_images` tables.
//!
//! Both tables share one shape, so every method takes a [`ChildKind`] that
//! selects the table. Child rows are only ever addressed through their
//! parent project.

use knitlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::child_item::{ChildItem, ChildKind};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, image_url, display_order, created_at";

/// Provides ordered access to a project's child collections.
pub struct ChildItemRepo;

impl ChildItemRepo {
    /// List a project's items of `kind` in display order.
    pub async fn list_for_project(
        pool: &PgPool,
        kind: ChildKind,
        project_id: DbId,
    ) -> Result<Vec<ChildItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE project_id = $1
             ORDER BY display_order ASC, id ASC",
            table = kind.table()
        );
        sqlx::query_as::<_, ChildItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Insert one item at the given display order, returning the created row.
    pub async fn insert<'e, E>(
        executor: E,
        kind: ChildKind,
        project_id: DbId,
        image_url: &str,
        display_order: i32,
    ) -> Result<ChildItem, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO {table} (project_id, image_url, display_order)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, ChildItem>(&query)
            .bind(project_id)
            .bind(image_url)
            .bind(display_order)
            .fetch_one(executor)
            .await
    }

    /// Delete every item of `kind` for a project. Returns the number removed.
    pub async fn delete_for_project<'e, E>(
        executor: E,
        kind: ChildKind,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("DELETE FROM {} WHERE project_id = $1", kind.table());
        let result = sqlx::query(&query).bind(project_id).execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Replace a project's items of `kind` with `image_urls`, in order.
    ///
    /// Runs in one transaction: either the old list is gone and the whole new
    /// list is stored, or nothing changed. Each item's display order is its
    /// index in `image_urls`.
    pub async fn replace(
        pool: &PgPool,
        kind: ChildKind,
        project_id: DbId,
        image_urls: &[String],
    ) -> Result<Vec<ChildItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::delete_for_project(&mut *tx, kind, project_id).await?;

        let mut items = Vec::with_capacity(image_urls.len());
        for (index, url) in image_urls.iter().enumerate() {
            let item =
                Self::insert(&mut *tx, kind, project_id, url, display_order(index)?).await?;
            items.push(item);
        }

        tx.commit().await?;
        Ok(items)
    }
}

/// Convert a list position into a display order value.
pub fn display_order(index: usize) -> Result<i32, sqlx::Error> {
    i32::try_from(index)
        .map_err(|_| sqlx::Error::Protocol(format!("display order {index} exceeds INTEGER range")))
}
