//! Route definitions for the `/phonograms` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::phonogram;
use crate::state::AppState;

/// Routes mounted at `/phonograms`.
///
/// ```text
/// GET    /                          -> list (?work_id=)
/// POST   /                          -> create
/// GET    /export                    -> export (?work_id=)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PUT    /{id}/audio                -> set_audio
/// GET    /{id}/participants         -> get_participants
/// PUT    /{id}/participants         -> replace_participants
/// GET    /{id}/participants/export  -> export_participants
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(phonogram::list).post(phonogram::create))
        .route("/export", get(phonogram::export))
        .route(
            "/{id}",
            get(phonogram::get_by_id)
                .put(phonogram::update)
                .delete(phonogram::delete),
        )
        .route("/{id}/audio", put(phonogram::set_audio))
        .route(
            "/{id}/participants",
            get(phonogram::get_participants).put(phonogram::replace_participants),
        )
        .route("/{id}/participants/export", get(phonogram::export_participants))
}
