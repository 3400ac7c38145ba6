//! Handlers for the `/works` resource, its authors and bulk delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rightsdesk_core::batch::{validate_batch_ids, BatchOutcome};
use rightsdesk_core::error::CoreError;
use rightsdesk_core::registration::{
    validate_status, validate_title, VALID_AUTHOR_ROLES, VALID_REGISTRATION_STATUSES,
};
use rightsdesk_core::types::DbId;
use rightsdesk_db::models::work::{CreateWork, UpdateWork, Work, WorkAuthor, WorkAuthorInput};
use rightsdesk_db::repositories::{WorkAuthorRepo, WorkRepo};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, NoticedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceAuthorsBody {
    pub authors: Vec<WorkAuthorInput>,
}

/// Result of deleting one work, including the phonograms removed with it.
#[derive(Debug, Serialize)]
pub struct WorkDeleted {
    pub work_id: DbId,
    pub phonograms_removed: u64,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/works
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWork>,
) -> AppResult<(StatusCode, Json<DataResponse<Work>>)> {
    validate_title("title", &input.title)?;
    if let Some(status) = &input.status {
        validate_status("status", status, VALID_REGISTRATION_STATUSES)?;
    }
    let work = WorkRepo::create(&state.pool, &input).await?;
    tracing::info!(work_id = work.id, project_id = ?work.project_id, "Work created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: work })))
}

/// GET /api/v1/works
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Work>>>> {
    let works = WorkRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: works }))
}

/// GET /api/v1/works/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Work>>> {
    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Work", id))?;
    Ok(Json(DataResponse { data: work }))
}

/// PUT /api/v1/works/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWork>,
) -> AppResult<Json<DataResponse<Work>>> {
    if let Some(title) = &input.title {
        validate_title("title", title)?;
    }
    if let Some(status) = &input.status {
        validate_status("status", status, VALID_REGISTRATION_STATUSES)?;
    }
    let work = WorkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Work", id))?;
    Ok(Json(DataResponse { data: work }))
}

/// DELETE /api/v1/works/{id}
///
/// Removes the work's phonograms first, then the work.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkDeleted>>> {
    let phonograms_removed = WorkRepo::delete_cascading(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Work", id))?;

    tracing::info!(work_id = id, phonograms_removed, "Work deleted");
    Ok(Json(DataResponse {
        data: WorkDeleted {
            work_id: id,
            phonograms_removed,
        },
    }))
}

/// POST /api/v1/works/bulk-delete
///
/// Deletes works one at a time, awaiting each before the next. A failed
/// item is recorded and the loop continues; nothing is rolled back. The
/// response is 200 when every item succeeded and 207 otherwise.
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteBody>,
) -> AppResult<(StatusCode, Json<NoticedResponse<BatchOutcome>>)> {
    validate_batch_ids(&body.ids)?;

    let mut outcome = BatchOutcome::new();
    for &id in &body.ids {
        match WorkRepo::delete_cascading(&state.pool, id).await {
            Ok(Some(_)) => outcome.record_ok(id),
            Ok(None) => outcome.record_err(id, CoreError::NotFound { entity: "Work", id }),
            Err(e) => {
                tracing::warn!(work_id = id, error = %e, "Bulk delete item failed");
                outcome.record_err(id, e);
            }
        }
    }

    tracing::info!(
        requested = body.ids.len(),
        deleted = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk work delete finished"
    );

    let status = if outcome.is_complete_success() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    let notice = outcome.notice("delete");
    Ok((status, Json(NoticedResponse { data: outcome, notice })))
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

fn validate_authors(authors: &[WorkAuthorInput]) -> Result<(), CoreError> {
    for (i, author) in authors.iter().enumerate() {
        validate_title(&format!("authors[{i}].name"), &author.name)?;
        validate_status(&format!("authors[{i}].role"), &author.role, VALID_AUTHOR_ROLES)?;
        if author.percentage.is_sign_negative() || author.percentage > Decimal::ONE_HUNDRED {
            return Err(CoreError::invalid_field(
                format!("authors[{i}].percentage"),
                "percentage must be between 0 and 100",
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/works/{id}/authors
pub async fn list_authors(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WorkAuthor>>>> {
    let authors = WorkAuthorRepo::list_by_work(&state.pool, id).await?;
    Ok(Json(DataResponse { data: authors }))
}

/// PUT /api/v1/works/{id}/authors
pub async fn replace_authors(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReplaceAuthorsBody>,
) -> AppResult<Json<DataResponse<Vec<WorkAuthor>>>> {
    validate_authors(&body.authors)?;

    WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Work", id))?;

    let authors = WorkAuthorRepo::replace_for_work(&state.pool, id, &body.authors).await?;
    Ok(Json(DataResponse { data: authors }))
}
