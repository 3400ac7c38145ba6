//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, release};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /lifecycle-summary        -> lifecycle_summary
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /{id}/lifecycle           -> lifecycle
/// GET    /{project_id}/releases    -> list_by_project
/// POST   /{project_id}/releases    -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/lifecycle-summary", get(project::lifecycle_summary))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/lifecycle", get(project::lifecycle))
        .route(
            "/{id}/releases",
            get(release::list_by_project).post(release::create),
        )
}
