//! Handlers for detections, society reports and divergence review.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rightsdesk_core::error::CoreError;
use rightsdesk_core::notice::Notice;
use rightsdesk_core::reconciliation::{
    self, DivergenceStatus, ExecutionDetection, ReconciliationConfig, ReconciliationOutcome,
    ReconciliationSummary, SocietyEntry, VALID_DETECTION_STATUSES,
};
use rightsdesk_core::registration::{validate_status, validate_title};
use rightsdesk_core::types::DbId;
use rightsdesk_db::models::detection::{CreateDetection, Detection};
use rightsdesk_db::models::divergence::{DivergenceRecord, UpdateDivergenceStatus};
use rightsdesk_db::models::society_report::{CreateSocietyReport, SocietyReport};
use rightsdesk_db::repositories::{DetectionRepo, DivergenceRepo, SocietyReportRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, NoticedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A batch reconciled in memory without touching the store.
#[derive(Debug, Deserialize)]
pub struct PreviewBody {
    #[serde(default)]
    pub detections: Vec<ExecutionDetection>,
    #[serde(default)]
    pub entries: Vec<SocietyEntry>,
    /// Overrides the configured threshold for this preview only.
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub report: SocietyReport,
    pub summary: ReconciliationSummary,
    pub divergences: Vec<DivergenceRecord>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_detection(input: &CreateDetection) -> Result<(), CoreError> {
    validate_title("title", &input.title)?;
    validate_title("artist", &input.artist)?;
    if let Some(status) = &input.status {
        validate_status("status", status, VALID_DETECTION_STATUSES)?;
    }
    if let Some(confidence) = input.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(CoreError::invalid_field(
                "confidence",
                "must be between 0 and 1",
            ));
        }
    }
    if input.play_count.is_some_and(|n| n < 0) {
        return Err(CoreError::invalid_field("play_count", "must not be negative"));
    }
    Ok(())
}

fn validate_report(input: &CreateSocietyReport) -> Result<(), CoreError> {
    validate_title("society", &input.society)?;
    if input.period_start > input.period_end {
        return Err(CoreError::invalid_field(
            "period_end",
            "must not be before period_start",
        ));
    }
    for (i, entry) in input.entries.iter().enumerate() {
        validate_title(&format!("entries[{i}].title"), &entry.title)?;
        if entry.play_count < 0 {
            return Err(CoreError::invalid_field(
                format!("entries[{i}].play_count"),
                "must not be negative",
            ));
        }
        if let (Some(start), Some(end)) = (entry.window_start, entry.window_end) {
            if start > end {
                return Err(CoreError::invalid_field(
                    format!("entries[{i}].window_end"),
                    "must not be before window_start",
                ));
            }
        }
    }
    Ok(())
}

/// Notice for a finished reconciliation run.
fn reconciliation_notice(summary: &ReconciliationSummary) -> Notice {
    let description = format!(
        "{} of {} records matched, {} divergences",
        summary.matched_records, summary.total_records, summary.divergent_records
    );
    if summary.divergent_records == 0 {
        Notice::success("Reconciliation complete", description)
    } else {
        Notice::warning("Reconciliation found divergences", description)
    }
}

// ---------------------------------------------------------------------------
// Detections and reports
// ---------------------------------------------------------------------------

/// POST /api/v1/detections
pub async fn create_detection(
    State(state): State<AppState>,
    Json(input): Json<CreateDetection>,
) -> AppResult<(StatusCode, Json<DataResponse<Detection>>)> {
    validate_detection(&input)?;
    let detection = DetectionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detection })))
}

/// POST /api/v1/society-reports
pub async fn create_report(
    State(state): State<AppState>,
    Json(input): Json<CreateSocietyReport>,
) -> AppResult<(StatusCode, Json<DataResponse<SocietyReport>>)> {
    validate_report(&input)?;
    let report = SocietyReportRepo::create(&state.pool, &input).await?;
    tracing::info!(
        report_id = report.id,
        society = %report.society,
        entries = input.entries.len(),
        "Society report filed"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/society-reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SocietyReport>>> {
    let report = SocietyReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("SocietyReport", id))?;
    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// POST /api/v1/society-reports/{id}/reconcile
///
/// Loads the report's entries and the detections for its period
/// concurrently, reconciles them, then replaces the report's open
/// divergences and records the counters.
pub async fn reconcile_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticedResponse<ReconcileResponse>>> {
    let report = SocietyReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("SocietyReport", id))?;

    let (entry_rows, detection_rows) = tokio::try_join!(
        SocietyReportRepo::list_entries(&state.pool, id),
        DetectionRepo::list_in_period(&state.pool, report.period_start, report.period_end),
    )?;

    let entries: Vec<SocietyEntry> = entry_rows.iter().map(|e| e.to_core()).collect();
    let detections = detection_rows
        .iter()
        .map(|d| d.to_core())
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = reconciliation::reconcile(&detections, &entries, &state.config.reconciliation());

    let divergences =
        DivergenceRepo::replace_open_for_report(&state.pool, id, &outcome.divergences).await?;
    let report = SocietyReportRepo::record_summary(&state.pool, id, &outcome.summary)
        .await?
        .ok_or(AppError::not_found("SocietyReport", id))?;

    tracing::info!(
        report_id = id,
        total = outcome.summary.total_records,
        matched = outcome.summary.matched_records,
        divergent = outcome.summary.divergent_records,
        skipped = outcome.summary.skipped_detections,
        "Reconciliation run complete"
    );

    let notice = reconciliation_notice(&outcome.summary);
    Ok(Json(NoticedResponse {
        data: ReconcileResponse {
            report,
            summary: outcome.summary,
            divergences,
        },
        notice,
    }))
}

/// GET /api/v1/society-reports/{id}/divergences
pub async fn list_divergences(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DivergenceRecord>>>> {
    let divergences = DivergenceRepo::list_by_report(&state.pool, id).await?;
    Ok(Json(DataResponse { data: divergences }))
}

/// POST /api/v1/reconciliation/preview
pub async fn preview(
    State(state): State<AppState>,
    Json(body): Json<PreviewBody>,
) -> AppResult<Json<NoticedResponse<ReconciliationOutcome>>> {
    let config = match body.min_confidence {
        Some(min_confidence) if (0.0..=1.0).contains(&min_confidence) => {
            ReconciliationConfig { min_confidence }
        }
        Some(_) => {
            return Err(CoreError::invalid_field("min_confidence", "must be between 0 and 1").into())
        }
        None => state.config.reconciliation(),
    };

    let outcome = reconciliation::reconcile(&body.detections, &body.entries, &config);
    let notice = reconciliation_notice(&outcome.summary);
    Ok(Json(NoticedResponse {
        data: outcome,
        notice,
    }))
}

/// PUT /api/v1/divergences/{id}/status
pub async fn update_divergence_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDivergenceStatus>,
) -> AppResult<Json<DataResponse<DivergenceRecord>>> {
    let requested = DivergenceStatus::from_str_value(&input.status)
        .map_err(|e| CoreError::invalid_field("status", e))?;

    let current = DivergenceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Divergence", id))?;
    let current_status =
        DivergenceStatus::from_str_value(&current.status).map_err(CoreError::Internal)?;

    let next = reconciliation::transition(current_status, requested)?;

    let updated =
        DivergenceRepo::update_status(&state.pool, id, next, input.resolution_note.as_deref())
            .await?
            .ok_or(AppError::not_found("Divergence", id))?;

    tracing::info!(
        divergence_id = id,
        from = current_status.as_str(),
        to = next.as_str(),
        "Divergence status changed"
    );
    Ok(Json(DataResponse { data: updated }))
}
