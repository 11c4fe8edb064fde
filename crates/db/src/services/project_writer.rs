//! Create, replace, and delete a project together with its child collections.
//!
//! Every operation runs in a single transaction. The parent row is the unit
//! of success: if it cannot be written, nothing is committed. What happens
//! when an individual child insert fails depends on the configured
//! [`ChildWritePolicy`]:
//!
//! - `BestEffort`: each insert runs in its own savepoint. A failure rolls back
//!   only that insert, is logged, and is counted in the [`ChildWriteReport`];
//!   the remaining inserts and the parent write still commit.
//! - `Strict`: the first failure aborts the whole operation.
//!
//! Child inserts are issued one at a time so display order assignment is
//! deterministic: an item's display order is its index in the filtered list,
//! whether or not earlier items failed.

use knitlog_core::project::ChildWritePolicy;
use knitlog_core::types::DbId;
use sqlx::{Acquire, Postgres, Transaction};

use crate::models::child_item::ChildKind;
use crate::models::project::ProjectWrite;
use crate::repositories::child_item_repo::display_order;
use crate::repositories::{ChildItemRepo, ProjectRepo};
use crate::DbPool;

/// Outcome of writing one child collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildWriteReport {
    /// Non-blank entries an insert was attempted for.
    pub attempted: usize,
    pub inserted: usize,
    /// Inserts that failed and were skipped (best-effort only).
    pub failed: usize,
}

/// Outcome of a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub project_id: DbId,
    /// `None` when the collection was not touched.
    pub patterns: Option<ChildWriteReport>,
    pub completed_images: Option<ChildWriteReport>,
}

impl WriteReport {
    /// Child inserts skipped across both collections.
    pub fn failed_children(&self) -> usize {
        [self.patterns, self.completed_images]
            .into_iter()
            .flatten()
            .map(|r| r.failed)
            .sum()
    }
}

/// Applies project writes against the store.
#[derive(Clone)]
pub struct ProjectWriter {
    pool: DbPool,
    policy: ChildWritePolicy,
}

impl ProjectWriter {
    pub fn new(pool: DbPool, policy: ChildWritePolicy) -> Self {
        Self { pool, policy }
    }

    /// Insert a project and both child lists.
    ///
    /// A list that was not submitted is treated as empty.
    pub async fn create(&self, write: &ProjectWrite) -> Result<WriteReport, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let project = ProjectRepo::create(&mut *tx, &write.fields).await?;

        let patterns = self
            .insert_children(
                &mut tx,
                ChildKind::Pattern,
                project.id,
                write.pattern_images.as_deref().unwrap_or(&[]),
            )
            .await?;
        let completed_images = self
            .insert_children(
                &mut tx,
                ChildKind::CompletedImage,
                project.id,
                write.completed_images.as_deref().unwrap_or(&[]),
            )
            .await?;

        tx.commit().await?;

        Ok(WriteReport {
            project_id: project.id,
            patterns: Some(patterns),
            completed_images: Some(completed_images),
        })
    }

    /// Overwrite a project's scalar fields and replace each submitted child
    /// collection wholesale (delete all, then reinsert in order).
    ///
    /// Returns `None` if no project with `id` exists; nothing is changed in
    /// that case.
    pub async fn update(
        &self,
        id: DbId,
        write: &ProjectWrite,
    ) -> Result<Option<WriteReport>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if ProjectRepo::update(&mut *tx, id, &write.fields).await?.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let patterns = self
            .replace_children(&mut tx, ChildKind::Pattern, id, write.pattern_images.as_deref())
            .await?;
        let completed_images = self
            .replace_children(
                &mut tx,
                ChildKind::CompletedImage,
                id,
                write.completed_images.as_deref(),
            )
            .await?;

        tx.commit().await?;

        Ok(Some(WriteReport {
            project_id: id,
            patterns,
            completed_images,
        }))
    }

    /// Delete a project; its child rows are removed by the cascade.
    ///
    /// Returns `false` if no project with `id` exists.
    pub async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        ProjectRepo::delete(&self.pool, id).await
    }

    async fn replace_children(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: ChildKind,
        project_id: DbId,
        urls: Option<&[String]>,
    ) -> Result<Option<ChildWriteReport>, sqlx::Error> {
        let Some(urls) = urls else {
            return Ok(None);
        };

        let removed = ChildItemRepo::delete_for_project(&mut **tx, kind, project_id).await?;
        tracing::debug!(project_id, kind = kind.label(), removed, "Cleared child items");

        let report = self.insert_children(tx, kind, project_id, urls).await?;
        Ok(Some(report))
    }

    async fn insert_children(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: ChildKind,
        project_id: DbId,
        urls: &[String],
    ) -> Result<ChildWriteReport, sqlx::Error> {
        let mut report = ChildWriteReport::default();

        for (index, url) in urls.iter().filter(|u| !u.trim().is_empty()).enumerate() {
            let order = display_order(index)?;
            report.attempted += 1;

            match self.policy {
                ChildWritePolicy::Strict => {
                    ChildItemRepo::insert(&mut **tx, kind, project_id, url, order).await?;
                    report.inserted += 1;
                }
                ChildWritePolicy::BestEffort => {
                    let mut savepoint = tx.begin().await?;
                    match ChildItemRepo::insert(&mut *savepoint, kind, project_id, url, order).await
                    {
                        Ok(_) => {
                            savepoint.commit().await?;
                            report.inserted += 1;
                        }
                        Err(e) => {
                            savepoint.rollback().await?;
                            report.failed += 1;
                            tracing::warn!(
                                project_id,
                                kind = kind.label(),
                                display_order = order,
                                error = %e,
                                "Child item insert failed; continuing with remaining items",
                            );
                        }
                    }
                }
            }
        }

        Ok(report)
    }
}
