//! Persisted reconciliation divergences.

use rightsdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `divergences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DivergenceRecord {
    pub id: DbId,
    pub report_id: DbId,
    pub divergence_type: String,
    pub title: String,
    pub artist: String,
    pub detected_count: i64,
    pub society_count: i64,
    pub detected_value: Option<Decimal>,
    pub society_value: Option<Decimal>,
    pub status: String,
    pub resolution_note: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for moving a divergence to `resolved`, `disputed` or back to `open`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDivergenceStatus {
    pub status: String,
    pub resolution_note: Option<String>,
}
