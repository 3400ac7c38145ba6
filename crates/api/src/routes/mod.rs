pub mod health;
pub mod phonogram;
pub mod project;
pub mod reconciliation;
pub mod release;
pub mod shares;
pub mod work;

use axum::routing::put;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                  list, create
/// /projects/lifecycle-summary                tag counts across projects
/// /projects/{id}                             get, update, delete
/// /projects/{id}/lifecycle                   derived lifecycle tag
/// /projects/{project_id}/releases            list, create
/// /releases/{id}                             update, delete
///
/// /works                                     list, create
/// /works/bulk-delete                         sequential bulk delete
/// /works/{id}                                get, update, delete (cascading)
/// /works/{id}/authors                        get, replace
///
/// /phonograms                                list (?work_id=), create
/// /phonograms/export                         export lines with category totals
/// /phonograms/{id}                           get, update, delete
/// /phonograms/{id}/audio                     set audio URL
/// /phonograms/{id}/participants              get summary, replace
/// /phonograms/{id}/participants/export       contributor lines
///
/// /shares/validate                           allocation check
/// /shares/import                             contributor rows -> participants
///
/// /detections                                create
/// /society-reports                           create
/// /society-reports/{id}                      get
/// /society-reports/{id}/reconcile            run reconciliation
/// /society-reports/{id}/divergences          list
/// /reconciliation/preview                    reconcile a posted batch
/// /divergences/{id}/status                   resolve, dispute, reopen
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/releases", release::router())
        .nest("/works", work::router())
        .nest("/phonograms", phonogram::router())
        .nest("/shares", shares::router())
        .merge(reconciliation::router())
        .route(
            "/divergences/{id}/status",
            put(handlers::reconciliation::update_divergence_status),
        )
}
