//! Row <-> entity mapping for spreadsheet import and export.
//!
//! Rows are flat string records; the file format itself is handled
//! elsewhere. Import keeps going past bad rows and reports every error
//! with its 1-based row number.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::isrc;
use crate::shares::{format_display, validate_participant, Participant, ParticipantRole};

/// Accepts `41.7`, `41,70`, `16.6 %`, `100`.
static PERCENTAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})(?:[.,](\d{1,4}))?\s*%?$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One contributor line as it appears in a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRow {
    #[serde(default)]
    pub phonogram_title: String,
    #[serde(default)]
    pub isrc: String,
    pub name: String,
    pub role: String,
    pub percentage: String,
}

/// A phonogram summary line for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonogramExportRow {
    pub title: String,
    pub work_title: String,
    pub isrc: String,
    pub status: String,
    pub producers_total: String,
    pub performers_total: String,
    pub musicians_total: String,
}

/// An import problem tied to a row and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Participants that parsed cleanly plus every row that did not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    pub participants: Vec<Participant>,
    pub errors: Vec<RowError>,
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a percentage cell, accepting `,` or `.` and a trailing `%`.
pub fn parse_percentage(cell: &str) -> Result<Decimal, String> {
    let trimmed = cell.trim();
    let caps = PERCENTAGE_RE
        .captures(trimmed)
        .ok_or_else(|| format!("'{trimmed}' is not a percentage"))?;

    let whole = &caps[1];
    let normalized = match caps.get(2) {
        Some(frac) => format!("{whole}.{}", frac.as_str()),
        None => whole.to_string(),
    };

    Decimal::from_str(&normalized).map_err(|e| format!("'{trimmed}' is not a percentage: {e}"))
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

pub fn participant_to_row(
    participant: &Participant,
    phonogram_title: &str,
    isrc_code: Option<&str>,
) -> ContributorRow {
    ContributorRow {
        phonogram_title: phonogram_title.to_string(),
        isrc: isrc_code.unwrap_or_default().to_string(),
        name: participant.name.clone(),
        role: participant.role.as_str().to_string(),
        percentage: format_display(participant.percentage),
    }
}

/// Map one row; `row` is the 1-based sheet row used in error reports.
pub fn row_to_participant(row: usize, cells: &ContributorRow) -> Result<Participant, RowError> {
    let err = |field: &str, message: String| RowError {
        row,
        field: field.to_string(),
        message,
    };

    let name = cells.name.trim();
    if name.is_empty() {
        return Err(err("name", "must not be empty".to_string()));
    }

    let role = ParticipantRole::from_str_value(cells.role.trim()).map_err(|e| err("role", e))?;
    let percentage = parse_percentage(&cells.percentage).map_err(|e| err("percentage", e))?;

    let participant = Participant::new(name, role, percentage);
    validate_participant(&participant).map_err(|e| match e {
        CoreError::InvalidField { field, message } => err(&field, message),
        other => err("row", other.to_string()),
    })?;

    if !cells.isrc.trim().is_empty() {
        let parts = isrc::parse(Some(cells.isrc.trim()));
        if parts.is_blank() {
            return Err(err("isrc", format!("'{}' is not a valid identifier", cells.isrc)));
        }
    }

    Ok(participant)
}

/// Map every row, collecting errors instead of stopping at the first.
pub fn rows_to_participants(rows: &[ContributorRow]) -> ImportResult {
    let mut result = ImportResult::default();
    for (i, cells) in rows.iter().enumerate() {
        match row_to_participant(i + 1, cells) {
            Ok(p) => result.participants.push(p),
            Err(e) => result.errors.push(e),
        }
    }
    result
}

/// Build an export line from already-computed category totals.
pub fn phonogram_to_export_row(
    title: &str,
    work_title: &str,
    isrc_code: Option<&str>,
    status: &str,
    totals: [Decimal; 3],
) -> PhonogramExportRow {
    PhonogramExportRow {
        title: title.to_string(),
        work_title: work_title.to_string(),
        isrc: isrc_code.unwrap_or_default().to_string(),
        status: status.to_string(),
        producers_total: format_display(totals[0]),
        performers_total: format_display(totals[1]),
        musicians_total: format_display(totals[2]),
    }
}
