//! Route definitions for detections, society reports and reconciliation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reconciliation;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// POST /detections                          -> create_detection
/// POST /society-reports                     -> create_report
/// GET  /society-reports/{id}                -> get_report
/// POST /society-reports/{id}/reconcile      -> reconcile_report
/// GET  /society-reports/{id}/divergences    -> list_divergences
/// POST /reconciliation/preview              -> preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/detections", post(reconciliation::create_detection))
        .route("/society-reports", post(reconciliation::create_report))
        .route("/society-reports/{id}", get(reconciliation::get_report))
        .route(
            "/society-reports/{id}/reconcile",
            post(reconciliation::reconcile_report),
        )
        .route(
            "/society-reports/{id}/divergences",
            get(reconciliation::list_divergences),
        )
        .route("/reconciliation/preview", post(reconciliation::preview))
}
