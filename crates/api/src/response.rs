//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use rightsdesk_core::notice::Notice;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A payload together with the notice shown to the user.
#[derive(Debug, Serialize)]
pub struct NoticedResponse<T: Serialize> {
    pub data: T,
    pub notice: Notice,
}
