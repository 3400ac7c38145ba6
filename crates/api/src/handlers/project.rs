//! Handlers for the `/projects` resource and its lifecycle view.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rightsdesk_core::lifecycle::{
    self, LifecycleTag, RegistrationView, ReleaseStatus, TagSummary, VALID_PROJECT_STATUSES,
};
use rightsdesk_core::registration::{validate_status, validate_title};
use rightsdesk_core::types::DbId;
use rightsdesk_db::models::project::{CreateProject, Project, UpdateProject};
use rightsdesk_db::repositories::{PhonogramRepo, ProjectRepo, ReleaseRepo, WorkRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Derived lifecycle for one project.
#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    pub project_id: DbId,
    pub tag: LifecycleTag,
    pub label: &'static str,
    pub view: RegistrationView,
    /// Every rule whose predicate holds; the first one decided the tag.
    pub matching_rules: Vec<&'static str>,
}

fn validate_project_fields(name: Option<&str>, status: Option<&str>) -> AppResult<()> {
    if let Some(name) = name {
        validate_title("name", name)?;
    }
    if let Some(status) = status {
        validate_status("status", status, VALID_PROJECT_STATUSES)?;
    }
    Ok(())
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_project_fields(Some(&input.name), input.status.as_deref())?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_project_fields(input.name.as_deref(), input.status.as_deref())?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Works keep existing with no project; releases go with the project.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Fetch the joined snapshot a project's tag is derived from.
///
/// The project, its works and its releases are independent reads and run
/// concurrently; phonograms need the work ids and follow.
async fn load_view(state: &AppState, project_id: DbId) -> AppResult<RegistrationView> {
    let (project, works, releases) = tokio::try_join!(
        ProjectRepo::find_by_id(&state.pool, project_id),
        WorkRepo::list_by_project(&state.pool, project_id),
        ReleaseRepo::list_by_project(&state.pool, project_id),
    )?;
    let project = project.ok_or(AppError::not_found("Project", project_id))?;

    let work_ids: Vec<DbId> = works.iter().map(|w| w.id).collect();
    let phonogram_work_ids: Vec<DbId> = PhonogramRepo::list_by_work_ids(&state.pool, &work_ids)
        .await?
        .into_iter()
        .map(|p| p.work_id)
        .collect();

    let release_statuses = releases
        .iter()
        .map(|r| r.release_status())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegistrationView::assemble(
        project.project_status()?,
        &work_ids,
        &phonogram_work_ids,
        &release_statuses,
    ))
}

/// GET /api/v1/projects/{id}/lifecycle
pub async fn lifecycle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LifecycleResponse>>> {
    let view = load_view(&state, id).await?;
    let tag = lifecycle::derive_tag(&view);

    Ok(Json(DataResponse {
        data: LifecycleResponse {
            project_id: id,
            tag,
            label: tag.label(),
            view,
            matching_rules: lifecycle::matching_rules(&view),
        },
    }))
}

/// GET /api/v1/projects/lifecycle-summary
///
/// Works, releases and phonograms for every project are fetched in three
/// batched queries and grouped per project before deriving each tag.
pub async fn lifecycle_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<TagSummary>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    let project_ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

    let (works, releases) = tokio::try_join!(
        WorkRepo::list_by_project_ids(&state.pool, &project_ids),
        ReleaseRepo::list_by_project_ids(&state.pool, &project_ids),
    )?;
    let work_ids: Vec<DbId> = works.iter().map(|w| w.id).collect();
    let phonograms = PhonogramRepo::list_by_work_ids(&state.pool, &work_ids).await?;

    let mut work_ids_by_project: HashMap<DbId, Vec<DbId>> = HashMap::new();
    let mut project_of_work: HashMap<DbId, DbId> = HashMap::new();
    for work in &works {
        if let Some(project_id) = work.project_id {
            work_ids_by_project.entry(project_id).or_default().push(work.id);
            project_of_work.insert(work.id, project_id);
        }
    }

    let mut phonogram_work_ids_by_project: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for phonogram in &phonograms {
        if let Some(&project_id) = project_of_work.get(&phonogram.work_id) {
            phonogram_work_ids_by_project
                .entry(project_id)
                .or_default()
                .push(phonogram.work_id);
        }
    }

    let mut release_statuses_by_project: HashMap<DbId, Vec<ReleaseStatus>> = HashMap::new();
    for release in &releases {
        release_statuses_by_project
            .entry(release.project_id)
            .or_default()
            .push(release.release_status()?);
    }

    let mut tags = Vec::with_capacity(projects.len());
    for project in &projects {
        let view = RegistrationView::assemble(
            project.project_status()?,
            ids_for(&work_ids_by_project, project.id),
            ids_for(&phonogram_work_ids_by_project, project.id),
            ids_for(&release_statuses_by_project, project.id),
        );
        tags.push(lifecycle::derive_tag(&view));
    }

    tracing::debug!(projects = projects.len(), "Lifecycle summary computed");
    Ok(Json(DataResponse {
        data: lifecycle::summarize_tags(&tags),
    }))
}

fn ids_for<T>(grouped: &HashMap<DbId, Vec<T>>, project_id: DbId) -> &[T] {
    grouped.get(&project_id).map_or(&[][..], Vec::as_slice)
}
