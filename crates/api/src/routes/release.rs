//! Route definitions for the `/releases` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::release;
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(release::update).delete(release::delete))
}
