//! Handlers for the `/phonograms` resource and its contributors.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rightsdesk_core::error::CoreError;
use rightsdesk_core::import_export::{self, ContributorRow, PhonogramExportRow};
use rightsdesk_core::isrc::{self, IsrcParts};
use rightsdesk_core::notice::Notice;
use rightsdesk_core::registration::{
    ensure_work_link_unchanged, validate_status, validate_title, VALID_REGISTRATION_STATUSES,
};
use rightsdesk_core::shares::{self, AllocationSummary, Participant, ShareCheck};
use rightsdesk_core::types::DbId;
use rightsdesk_db::models::phonogram::{CreatePhonogram, Phonogram, UpdatePhonogram};
use rightsdesk_db::repositories::{PhonogramRepo, WorkRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, NoticedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PhonogramListParams {
    pub work_id: Option<DbId>,
}

/// Create body; the identifier arrives as its four parts.
#[derive(Debug, Deserialize)]
pub struct CreatePhonogramBody {
    pub work_id: DbId,
    pub title: String,
    pub isrc: Option<IsrcParts>,
    pub status: Option<String>,
}

/// Update body. `work_id` may be restated but not changed.
#[derive(Debug, Deserialize)]
pub struct UpdatePhonogramBody {
    pub work_id: Option<DbId>,
    pub title: Option<String>,
    pub isrc: Option<IsrcParts>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetAudioBody {
    pub audio_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceParticipantsBody {
    pub participants: Vec<Participant>,
}

/// A phonogram with its identifier split for the edit form.
#[derive(Debug, Serialize)]
pub struct PhonogramView {
    #[serde(flatten)]
    pub phonogram: Phonogram,
    pub isrc_parts: IsrcParts,
}

impl From<Phonogram> for PhonogramView {
    fn from(phonogram: Phonogram) -> Self {
        let isrc_parts = isrc::parse(phonogram.isrc.as_deref());
        Self {
            phonogram,
            isrc_parts,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParticipantsView {
    pub participants: Vec<Participant>,
    pub summary: AllocationSummary,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate identifier parts and compose them; blank parts store NULL.
fn compose_isrc(parts: &IsrcParts) -> Result<Option<String>, CoreError> {
    isrc::validate_parts(parts)?;
    Ok(isrc::compose(parts))
}

fn participants_view(participants: Vec<Participant>) -> ParticipantsView {
    let (producers, performers, musicians) = shares::split_by_category(&participants);
    let summary = shares::summarize(&producers, &performers, &musicians);
    ParticipantsView {
        participants,
        summary,
    }
}

/// Notice for a share check; over-cap allocations are a warning, not an error.
pub(crate) fn share_notice(check: &ShareCheck, saved: bool) -> Notice {
    match check {
        ShareCheck::Ok if saved => {
            Notice::success("Contributors saved", "All categories within cap")
        }
        ShareCheck::Ok => Notice::success("Shares valid", "All categories within cap"),
        ShareCheck::CapExceeded { category, total } => Notice::warning(
            "Share cap exceeded",
            format!(
                "{} total {} exceeds cap {}",
                category.as_str(),
                shares::format_display(*total),
                shares::format_display(category.cap())
            ),
        ),
    }
}

async fn find_phonogram(state: &AppState, id: DbId) -> AppResult<Phonogram> {
    PhonogramRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Phonogram", id))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/phonograms
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreatePhonogramBody>,
) -> AppResult<(StatusCode, Json<DataResponse<PhonogramView>>)> {
    validate_title("title", &body.title)?;
    if let Some(status) = &body.status {
        validate_status("status", status, VALID_REGISTRATION_STATUSES)?;
    }
    let isrc_code = match &body.isrc {
        Some(parts) => compose_isrc(parts)?,
        None => None,
    };

    WorkRepo::find_by_id(&state.pool, body.work_id)
        .await?
        .ok_or(AppError::not_found("Work", body.work_id))?;

    let input = CreatePhonogram {
        work_id: body.work_id,
        title: body.title,
        isrc: isrc_code,
        status: body.status,
    };
    let phonogram = PhonogramRepo::create(&state.pool, &input).await?;
    tracing::info!(phonogram_id = phonogram.id, work_id = phonogram.work_id, "Phonogram created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: phonogram.into(),
        }),
    ))
}

/// GET /api/v1/phonograms?work_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PhonogramListParams>,
) -> AppResult<Json<DataResponse<Vec<PhonogramView>>>> {
    let phonograms = match params.work_id {
        Some(work_id) => PhonogramRepo::list_by_work(&state.pool, work_id).await?,
        None => PhonogramRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse {
        data: phonograms.into_iter().map(PhonogramView::from).collect(),
    }))
}

/// GET /api/v1/phonograms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PhonogramView>>> {
    let phonogram = find_phonogram(&state, id).await?;
    Ok(Json(DataResponse {
        data: phonogram.into(),
    }))
}

/// PUT /api/v1/phonograms/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdatePhonogramBody>,
) -> AppResult<Json<DataResponse<PhonogramView>>> {
    if let Some(title) = &body.title {
        validate_title("title", title)?;
    }
    if let Some(status) = &body.status {
        validate_status("status", status, VALID_REGISTRATION_STATUSES)?;
    }

    let current = find_phonogram(&state, id).await?;
    ensure_work_link_unchanged(current.work_id, body.work_id)?;

    let mut input = UpdatePhonogram {
        title: body.title,
        isrc: None,
        status: body.status,
        clear_isrc: false,
    };
    if let Some(parts) = &body.isrc {
        match compose_isrc(parts)? {
            Some(code) => input.isrc = Some(code),
            None => input.clear_isrc = true,
        }
    }

    let phonogram = PhonogramRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Phonogram", id))?;
    Ok(Json(DataResponse {
        data: phonogram.into(),
    }))
}

/// DELETE /api/v1/phonograms/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if PhonogramRepo::delete(&state.pool, id).await? {
        tracing::info!(phonogram_id = id, "Phonogram deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Phonogram", id))
    }
}

/// PUT /api/v1/phonograms/{id}/audio
///
/// The upload itself happens against the blob store; this stores the URL.
pub async fn set_audio(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<SetAudioBody>,
) -> AppResult<Json<DataResponse<PhonogramView>>> {
    let url = body.audio_url.trim();
    if url.is_empty() {
        return Err(CoreError::invalid_field("audio_url", "must not be empty").into());
    }
    let phonogram = PhonogramRepo::set_audio_url(&state.pool, id, url)
        .await?
        .ok_or(AppError::not_found("Phonogram", id))?;
    Ok(Json(DataResponse {
        data: phonogram.into(),
    }))
}

// ---------------------------------------------------------------------------
// Contributors
// ---------------------------------------------------------------------------

/// GET /api/v1/phonograms/{id}/participants
pub async fn get_participants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ParticipantsView>>> {
    find_phonogram(&state, id).await?;
    let participants = PhonogramRepo::list_participants(&state.pool, id)
        .await?
        .iter()
        .map(|row| row.to_participant())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse {
        data: participants_view(participants),
    }))
}

/// PUT /api/v1/phonograms/{id}/participants
///
/// Range errors always block. A category over its cap is only reported,
/// unless the server is configured to block over-cap saves.
pub async fn replace_participants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReplaceParticipantsBody>,
) -> AppResult<Json<NoticedResponse<ParticipantsView>>> {
    shares::validate_participants(&body.participants)?;

    let view = participants_view(body.participants);
    shares::enforce(state.config.share_policy(), &view.summary.check)?;

    find_phonogram(&state, id).await?;
    PhonogramRepo::replace_participants(&state.pool, id, &view.participants).await?;

    if let ShareCheck::CapExceeded { category, total } = &view.summary.check {
        tracing::warn!(phonogram_id = id, category = category.as_str(), %total, "Saved over cap");
    }

    let notice = share_notice(&view.summary.check, true);
    Ok(Json(NoticedResponse { data: view, notice }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/phonograms/export?work_id=
///
/// One line per phonogram with its work title and per-category totals.
/// Works and contributors are loaded in two batched queries.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<PhonogramListParams>,
) -> AppResult<Json<DataResponse<Vec<PhonogramExportRow>>>> {
    let phonograms = match params.work_id {
        Some(work_id) => PhonogramRepo::list_by_work(&state.pool, work_id).await?,
        None => PhonogramRepo::list(&state.pool).await?,
    };

    let phonogram_ids: Vec<DbId> = phonograms.iter().map(|p| p.id).collect();
    let mut work_ids: Vec<DbId> = phonograms.iter().map(|p| p.work_id).collect();
    work_ids.sort_unstable();
    work_ids.dedup();

    let (works, participant_rows) = tokio::try_join!(
        WorkRepo::list_by_ids(&state.pool, &work_ids),
        PhonogramRepo::list_participants_by_phonogram_ids(&state.pool, &phonogram_ids),
    )?;

    let work_titles: HashMap<DbId, &str> =
        works.iter().map(|w| (w.id, w.title.as_str())).collect();

    let mut participants_by_phonogram: HashMap<DbId, Vec<Participant>> = HashMap::new();
    for row in &participant_rows {
        participants_by_phonogram
            .entry(row.phonogram_id)
            .or_default()
            .push(row.to_participant()?);
    }

    let rows = phonograms
        .iter()
        .map(|p| {
            let participants = participants_by_phonogram
                .get(&p.id)
                .map_or(&[][..], Vec::as_slice);
            let (producers, performers, musicians) = shares::split_by_category(participants);
            import_export::phonogram_to_export_row(
                &p.title,
                work_titles.get(&p.work_id).copied().unwrap_or_default(),
                p.isrc.as_deref(),
                &p.status,
                [
                    shares::category_total(&producers),
                    shares::category_total(&performers),
                    shares::category_total(&musicians),
                ],
            )
        })
        .collect();

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/phonograms/{id}/participants/export
///
/// Contributor lines in the same shape `/shares/import` accepts.
pub async fn export_participants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ContributorRow>>>> {
    let phonogram = find_phonogram(&state, id).await?;
    let rows = PhonogramRepo::list_participants(&state.pool, id)
        .await?
        .iter()
        .map(|row| {
            row.to_participant().map(|participant| {
                import_export::participant_to_row(
                    &participant,
                    &phonogram.title,
                    phonogram.isrc.as_deref(),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: rows }))
}
