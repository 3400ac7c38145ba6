//! Route definitions for the `/works` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work;
use crate::state::AppState;

/// Routes mounted at `/works`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /bulk-delete    -> bulk_delete
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// GET    /{id}/authors   -> list_authors
/// PUT    /{id}/authors   -> replace_authors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(work::list).post(work::create))
        .route("/bulk-delete", post(work::bulk_delete))
        .route(
            "/{id}",
            get(work::get_by_id).put(work::update).delete(work::delete),
        )
        .route(
            "/{id}/authors",
            get(work::list_authors).put(work::replace_authors),
        )
}
