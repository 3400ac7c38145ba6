//! Collection society statements and their itemized entries.

use rightsdesk_core::reconciliation::{SocietyEntry, TimeWindow};
use rightsdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `society_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocietyReport {
    pub id: DbId,
    pub society: String,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub total_records: i32,
    pub matched_records: i32,
    pub divergent_records: i32,
    pub reconciled_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A row from the `society_report_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocietyReportEntry {
    pub id: DbId,
    pub report_id: DbId,
    pub title: String,
    pub artist: String,
    pub play_count: i32,
    pub value: Option<Decimal>,
    pub window_start: Option<Timestamp>,
    pub window_end: Option<Timestamp>,
}

impl SocietyReportEntry {
    pub fn to_core(&self) -> SocietyEntry {
        let window = match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => Some(TimeWindow { start, end }),
            _ => None,
        };
        SocietyEntry {
            title: self.title.clone(),
            artist: self.artist.clone(),
            play_count: u32::try_from(self.play_count).unwrap_or_default(),
            value: self.value,
            window,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportEntry {
    pub title: String,
    pub artist: String,
    pub play_count: i32,
    pub value: Option<Decimal>,
    pub window_start: Option<Timestamp>,
    pub window_end: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSocietyReport {
    pub society: String,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    #[serde(default)]
    pub entries: Vec<CreateReportEntry>,
}
