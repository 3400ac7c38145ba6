//! Broadcast executions picked up by monitoring.

use rightsdesk_core::error::CoreError;
use rightsdesk_core::reconciliation::{DetectionStatus, ExecutionDetection};
use rightsdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `execution_detections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Detection {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub station: String,
    pub detected_at: Timestamp,
    pub confidence: f64,
    pub status: String,
    pub play_count: i32,
    pub value: Option<Decimal>,
    pub created_at: Timestamp,
}

impl Detection {
    pub fn to_core(&self) -> Result<ExecutionDetection, CoreError> {
        Ok(ExecutionDetection {
            title: self.title.clone(),
            artist: self.artist.clone(),
            station: self.station.clone(),
            detected_at: self.detected_at,
            confidence: self.confidence,
            status: DetectionStatus::from_str_value(&self.status).map_err(CoreError::Internal)?,
            play_count: u32::try_from(self.play_count).unwrap_or_default(),
            value: self.value,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDetection {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub station: String,
    pub detected_at: Timestamp,
    pub confidence: Option<f64>,
    pub status: Option<String>,
    pub play_count: Option<i32>,
    pub value: Option<Decimal>,
}
