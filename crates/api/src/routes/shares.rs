//! Route definitions for stateless share checks.

use axum::routing::post;
use axum::Router;

use crate::handlers::shares;
use crate::state::AppState;

/// Routes mounted at `/shares`.
///
/// ```text
/// POST /validate   -> validate
/// POST /import     -> import
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(shares::validate))
        .route("/import", post(shares::import))
}
