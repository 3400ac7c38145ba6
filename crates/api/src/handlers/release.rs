//! Handlers for releases, nested under projects for create/list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rightsdesk_core::lifecycle::VALID_RELEASE_STATUSES;
use rightsdesk_core::registration::{validate_status, validate_title};
use rightsdesk_core::types::DbId;
use rightsdesk_db::models::release::{CreateRelease, Release, UpdateRelease};
use rightsdesk_db::repositories::{ProjectRepo, ReleaseRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/releases
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRelease>,
) -> AppResult<(StatusCode, Json<DataResponse<Release>>)> {
    validate_title("title", &input.title)?;
    if let Some(status) = &input.status {
        validate_status("status", status, VALID_RELEASE_STATUSES)?;
    }

    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;

    let release = ReleaseRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        release_id = release.id,
        status = %release.status,
        "Release created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: release })))
}

/// GET /api/v1/projects/{id}/releases
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Release>>>> {
    let releases = ReleaseRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: releases }))
}

/// PUT /api/v1/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<Json<DataResponse<Release>>> {
    if let Some(title) = &input.title {
        validate_title("title", title)?;
    }
    if let Some(status) = &input.status {
        validate_status("status", status, VALID_RELEASE_STATUSES)?;
    }
    let release = ReleaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Release", id))?;
    Ok(Json(DataResponse { data: release }))
}

/// DELETE /api/v1/releases/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ReleaseRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Release", id))
    }
}
