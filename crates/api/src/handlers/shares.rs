//! Stateless share validation and contributor import.

use axum::Json;
use rightsdesk_core::import_export::{self, ContributorRow, RowError};
use rightsdesk_core::notice::Notice;
use rightsdesk_core::shares::{self, AllocationSummary, Participant};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::phonogram::share_notice;
use crate::response::NoticedResponse;

#[derive(Debug, Deserialize)]
pub struct ValidateSharesBody {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRowsBody {
    pub rows: Vec<ContributorRow>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub participants: Vec<Participant>,
    pub errors: Vec<RowError>,
    pub summary: AllocationSummary,
}

/// POST /api/v1/shares/validate
///
/// Same check the contributor save runs, without persisting anything.
pub async fn validate(
    Json(body): Json<ValidateSharesBody>,
) -> AppResult<Json<NoticedResponse<AllocationSummary>>> {
    shares::validate_participants(&body.participants)?;

    let (producers, performers, musicians) = shares::split_by_category(&body.participants);
    let summary = shares::summarize(&producers, &performers, &musicians);
    let notice = share_notice(&summary.check, false);

    Ok(Json(NoticedResponse {
        data: summary,
        notice,
    }))
}

/// POST /api/v1/shares/import
///
/// Maps sheet rows to participants. Bad rows are reported with their row
/// number and do not stop the rest from importing.
pub async fn import(
    Json(body): Json<ImportRowsBody>,
) -> AppResult<Json<NoticedResponse<ImportResponse>>> {
    let result = import_export::rows_to_participants(&body.rows);

    let (producers, performers, musicians) = shares::split_by_category(&result.participants);
    let summary = shares::summarize(&producers, &performers, &musicians);

    let imported = result.participants.len();
    let rejected = result.errors.len();
    let notice = if rejected == 0 {
        Notice::success("Import complete", format!("{imported} rows imported"))
    } else if imported == 0 {
        Notice::error("Import failed", format!("0 rows imported, {rejected} rejected"))
    } else {
        Notice::warning(
            "Import partially complete",
            format!("{imported} rows imported, {rejected} rejected"),
        )
    };

    Ok(Json(NoticedResponse {
        data: ImportResponse {
            participants: result.participants,
            errors: result.errors,
            summary,
        },
        notice,
    }))
}
