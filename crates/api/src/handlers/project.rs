//! Handlers for the `/projects` resource.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use knitlog_core::error::CoreError;
use knitlog_core::project::{normalize_category, parse_id};
use knitlog_core::types::DbId;
use knitlog_db::models::project::{
    ProjectDetail, ProjectPayload, ProjectSummary, ProjectWrite, SummaryFilter,
};
use knitlog_db::services::WriteReport;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Authenticated;
use crate::response::{CreatedResponse, SuccessResponse};
use crate::state::AppState;

/// Submissions whose embedded strings exceed this are logged as oversized.
const LARGE_PAYLOAD_WARN_BYTES: usize = 1024 * 1024;

/// Query parameters for `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Category tag or alias (`crochet`, `knitting`).
    pub category: Option<String>,
    /// Only projects with a photo.
    pub with_photo: Option<bool>,
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let Query(query) = query?;
    let filter = SummaryFilter {
        category: normalize_category(query.category)?,
        with_photo: query.with_photo.unwrap_or(false),
    };
    Ok(Json(state.reader.list_summaries(&filter).await))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<ProjectDetail>> {
    let id = parse_id(&raw_id)?;
    let detail = state.reader.get_detail(id).await.ok_or(not_found(id))?;
    Ok(Json(detail))
}

/// POST /api/projects
pub async fn create(
    auth: Authenticated,
    State(state): State<AppState>,
    input: Result<Json<ProjectPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let write = prepare_write(input, None)?;
    let report = state.writer.create(&write).await?;
    log_write(&report, "created", &auth);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: report.project_id,
        }),
    ))
}

/// PUT /api/projects/{id}
pub async fn update(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    input: Result<Json<ProjectPayload>, JsonRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let id = parse_id(&raw_id)?;
    let write = prepare_write(input, Some(id))?;
    let report = state
        .writer
        .update(id, &write)
        .await?
        .ok_or(not_found(id))?;
    log_write(&report, "updated", &auth);
    Ok(Json(SuccessResponse::OK))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    let id = parse_id(&raw_id)?;
    if !state.writer.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(project_id = id, session_id = %auth.session_id, "Project deleted");
    Ok(Json(SuccessResponse::OK))
}

fn prepare_write(
    input: Result<Json<ProjectPayload>, JsonRejection>,
    id: Option<DbId>,
) -> AppResult<ProjectWrite> {
    let Json(payload) = input?;

    let size = payload.approximate_size();
    if size > LARGE_PAYLOAD_WARN_BYTES {
        tracing::warn!(project_id = ?id, size_bytes = size, "Large project payload");
    }

    Ok(ProjectWrite::try_from(payload)?)
}

fn log_write(report: &WriteReport, action: &'static str, auth: &Authenticated) {
    let failed = report.failed_children();
    if failed > 0 {
        tracing::warn!(
            project_id = report.project_id,
            session_id = %auth.session_id,
            action,
            failed_children = failed,
            "Project saved with skipped child items",
        );
    } else {
        tracing::info!(
            project_id = report.project_id,
            session_id = %auth.session_id,
            action,
            "Project saved",
        );
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}
