//! Reconciliation of detected broadcast executions against a collection
//! society's filed statement.
//!
//! Detections and report entries are keyed by normalized `(title, artist)`.
//! Unmatched detections, unmatched entries, and matched pairs whose play
//! count or value disagree each produce a [`Divergence`] in status `open`.
//! Resolving a divergence is a separate step (see [`transition`]).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DIVERGENCE_NOT_IN_SOCIETY: &str = "not_in_society";
pub const DIVERGENCE_NOT_DETECTED: &str = "not_detected";
pub const DIVERGENCE_VALUE_MISMATCH: &str = "value_mismatch";
pub const DIVERGENCE_COUNT_MISMATCH: &str = "count_mismatch";

/// All valid divergence type strings.
pub const VALID_DIVERGENCE_TYPES: &[&str] = &[
    DIVERGENCE_NOT_IN_SOCIETY,
    DIVERGENCE_NOT_DETECTED,
    DIVERGENCE_VALUE_MISMATCH,
    DIVERGENCE_COUNT_MISMATCH,
];

pub const STATUS_OPEN: &str = "open";
pub const STATUS_RESOLVED: &str = "resolved";
pub const STATUS_DISPUTED: &str = "disputed";

/// All valid divergence status strings.
pub const VALID_DIVERGENCE_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_RESOLVED, STATUS_DISPUTED];

pub const DETECTION_DETECTED: &str = "detected";
pub const DETECTION_CONFIRMED: &str = "confirmed";
pub const DETECTION_REJECTED: &str = "rejected";

/// All valid detection status strings.
pub const VALID_DETECTION_STATUSES: &[&str] =
    &[DETECTION_DETECTED, DETECTION_CONFIRMED, DETECTION_REJECTED];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceType {
    NotInSociety,
    NotDetected,
    ValueMismatch,
    CountMismatch,
}

impl DivergenceType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            DIVERGENCE_NOT_IN_SOCIETY => Ok(Self::NotInSociety),
            DIVERGENCE_NOT_DETECTED => Ok(Self::NotDetected),
            DIVERGENCE_VALUE_MISMATCH => Ok(Self::ValueMismatch),
            DIVERGENCE_COUNT_MISMATCH => Ok(Self::CountMismatch),
            _ => Err(format!(
                "Invalid divergence type '{s}'. Must be one of: {}",
                VALID_DIVERGENCE_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInSociety => DIVERGENCE_NOT_IN_SOCIETY,
            Self::NotDetected => DIVERGENCE_NOT_DETECTED,
            Self::ValueMismatch => DIVERGENCE_VALUE_MISMATCH,
            Self::CountMismatch => DIVERGENCE_COUNT_MISMATCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceStatus {
    Open,
    Resolved,
    Disputed,
}

impl DivergenceStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_OPEN => Ok(Self::Open),
            STATUS_RESOLVED => Ok(Self::Resolved),
            STATUS_DISPUTED => Ok(Self::Disputed),
            _ => Err(format!(
                "Invalid divergence status '{s}'. Must be one of: {}",
                VALID_DIVERGENCE_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::Resolved => STATUS_RESOLVED,
            Self::Disputed => STATUS_DISPUTED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Detected,
    Confirmed,
    Rejected,
}

impl DetectionStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            DETECTION_DETECTED => Ok(Self::Detected),
            DETECTION_CONFIRMED => Ok(Self::Confirmed),
            DETECTION_REJECTED => Ok(Self::Rejected),
            _ => Err(format!(
                "Invalid detection status '{s}'. Must be one of: {}",
                VALID_DETECTION_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detected => DETECTION_DETECTED,
            Self::Confirmed => DETECTION_CONFIRMED,
            Self::Rejected => DETECTION_REJECTED,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

fn one() -> u32 {
    1
}

/// A play picked up by internal monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDetection {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub station: String,
    pub detected_at: Timestamp,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_detection_status")]
    pub status: DetectionStatus,
    /// Plays represented by this record; monitoring feeds usually send 1.
    #[serde(default = "one")]
    pub play_count: u32,
    #[serde(default)]
    pub value: Option<Decimal>,
}

fn default_confidence() -> f64 {
    1.0
}

fn default_detection_status() -> DetectionStatus {
    DetectionStatus::Detected
}

/// Inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at <= self.end
    }
}

/// One itemized line of a society report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocietyEntry {
    pub title: String,
    pub artist: String,
    pub play_count: u32,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub window: Option<TimeWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Detections below this confidence are left out of matching.
    pub min_confidence: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    pub divergence_type: DivergenceType,
    pub title: String,
    pub artist: String,
    pub detected_count: u64,
    pub society_count: u64,
    pub detected_value: Option<Decimal>,
    pub society_value: Option<Decimal>,
    pub status: DivergenceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationSummary {
    pub total_records: usize,
    pub matched_records: usize,
    pub divergent_records: usize,
    pub skipped_detections: usize,
    pub match_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationOutcome {
    pub divergences: Vec<Divergence>,
    pub summary: ReconciliationSummary,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Comparison key: trimmed, whitespace-collapsed, lowercased title and artist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub title: String,
    pub artist: String,
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn normalize_key(title: &str, artist: &str) -> MatchKey {
    MatchKey {
        title: normalize(title),
        artist: normalize(artist),
    }
}

/// `matched / total`, or 0 when there is nothing to compare.
pub fn match_rate(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

/// Plays are summed in `u64`; `u32` per-record counts cannot overflow it.
fn sum_plays<'a>(detections: impl Iterator<Item = &'a ExecutionDetection>) -> u64 {
    detections.map(|d| u64::from(d.play_count)).sum()
}

fn sum_values<'a>(values: impl Iterator<Item = Option<&'a Decimal>>) -> Option<Decimal> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(Decimal::ZERO) + v))
}

/// Compare a detection batch with a report's entries for the same period.
pub fn reconcile(
    detections: &[ExecutionDetection],
    entries: &[SocietyEntry],
    config: &ReconciliationConfig,
) -> ReconciliationOutcome {
    let eligible: Vec<&ExecutionDetection> = detections
        .iter()
        .filter(|d| d.status != DetectionStatus::Rejected && d.confidence >= config.min_confidence)
        .collect();
    let skipped_detections = detections.len() - eligible.len();

    // Group eligible detections by key, keeping first-seen order.
    let mut group_order: Vec<MatchKey> = Vec::new();
    let mut groups: HashMap<MatchKey, Vec<usize>> = HashMap::new();
    for (idx, detection) in eligible.iter().enumerate() {
        let key = normalize_key(&detection.title, &detection.artist);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                group_order.push(key);
                Vec::new()
            })
            .push(idx);
    }

    let mut claimed = vec![false; eligible.len()];
    let mut divergences = Vec::new();
    let mut matched_records = 0usize;
    let mut mismatched_pairs = 0usize;
    let mut unmatched_entries = 0usize;

    for entry in entries {
        let key = normalize_key(&entry.title, &entry.artist);
        let candidates: Vec<usize> = groups
            .get(&key)
            .map(|idxs| {
                idxs.iter()
                    .copied()
                    .filter(|&i| !claimed[i])
                    .filter(|&i| {
                        entry
                            .window
                            .map_or(true, |w| w.contains(eligible[i].detected_at))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if candidates.is_empty() {
            unmatched_entries += 1;
            divergences.push(Divergence {
                divergence_type: DivergenceType::NotDetected,
                title: entry.title.clone(),
                artist: entry.artist.clone(),
                detected_count: 0,
                society_count: u64::from(entry.play_count),
                detected_value: None,
                society_value: entry.value,
                status: DivergenceStatus::Open,
            });
            continue;
        }

        for &i in &candidates {
            claimed[i] = true;
        }
        matched_records += 1;

        let detected_count = sum_plays(candidates.iter().map(|&i| eligible[i]));
        let detected_value = sum_values(candidates.iter().map(|&i| eligible[i].value.as_ref()));

        let mut pair_diverged = false;
        let mut push = |divergence_type| {
            divergences.push(Divergence {
                divergence_type,
                title: entry.title.clone(),
                artist: entry.artist.clone(),
                detected_count,
                society_count: u64::from(entry.play_count),
                detected_value,
                society_value: entry.value,
                status: DivergenceStatus::Open,
            });
        };

        if detected_count != u64::from(entry.play_count) {
            push(DivergenceType::CountMismatch);
            pair_diverged = true;
        }
        if let (Some(detected), Some(reported)) = (detected_value, entry.value) {
            if detected != reported {
                push(DivergenceType::ValueMismatch);
                pair_diverged = true;
            }
        }
        if pair_diverged {
            mismatched_pairs += 1;
        }
    }

    // Whatever no entry claimed was never reported to the society.
    let mut unmatched_groups = 0usize;
    for key in &group_order {
        let leftover: Vec<usize> = groups[key]
            .iter()
            .copied()
            .filter(|&i| !claimed[i])
            .collect();
        let Some(&first) = leftover.first() else {
            continue;
        };

        unmatched_groups += 1;
        divergences.push(Divergence {
            divergence_type: DivergenceType::NotInSociety,
            title: eligible[first].title.clone(),
            artist: eligible[first].artist.clone(),
            detected_count: sum_plays(leftover.iter().map(|&i| eligible[i])),
            society_count: 0,
            detected_value: sum_values(leftover.iter().map(|&i| eligible[i].value.as_ref())),
            society_value: None,
            status: DivergenceStatus::Open,
        });
    }

    let total_records = matched_records + unmatched_groups + unmatched_entries;
    let divergent_records = mismatched_pairs + unmatched_groups + unmatched_entries;

    ReconciliationOutcome {
        divergences,
        summary: ReconciliationSummary {
            total_records,
            matched_records,
            divergent_records,
            skipped_detections,
            match_rate: match_rate(matched_records, total_records),
        },
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Validate a divergence status change.
///
/// Open divergences may be resolved or disputed; disputed ones may be
/// resolved or reopened. Resolved is terminal.
pub fn transition(
    from: DivergenceStatus,
    to: DivergenceStatus,
) -> Result<DivergenceStatus, CoreError> {
    use DivergenceStatus::*;

    match (from, to) {
        (Open, Resolved) | (Open, Disputed) | (Disputed, Resolved) | (Disputed, Open) => Ok(to),
        _ => Err(CoreError::Validation(format!(
            "Cannot move divergence from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn at(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn detection(title: &str, artist: &str, count: u32) -> ExecutionDetection {
        ExecutionDetection {
            title: title.to_string(),
            artist: artist.to_string(),
            station: "Radio 1".to_string(),
            detected_at: at(10),
            confidence: 0.95,
            status: DetectionStatus::Confirmed,
            play_count: count,
            value: None,
        }
    }

    fn entry(title: &str, artist: &str, count: u32) -> SocietyEntry {
        SocietyEntry {
            title: title.to_string(),
            artist: artist.to_string(),
            play_count: count,
            value: None,
            window: None,
        }
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // -- normalize_key -------------------------------------------------------

    #[test]
    fn key_ignores_case_and_outer_whitespace() {
        assert_eq!(normalize_key("X", "Y"), normalize_key("x", " y "));
    }

    #[test]
    fn key_collapses_inner_whitespace() {
        assert_eq!(
            normalize_key("Hello   World", "A  B"),
            normalize_key("hello world", "a b")
        );
    }

    #[test]
    fn key_distinguishes_artist() {
        assert_ne!(normalize_key("Song", "A"), normalize_key("Song", "B"));
    }

    // -- reconcile -----------------------------------------------------------

    #[test]
    fn unmatched_detection_yields_single_not_in_society() {
        let outcome = reconcile(&[detection("Song", "Band", 2)], &[], &Default::default());
        assert_eq!(outcome.divergences.len(), 1);
        let div = &outcome.divergences[0];
        assert_eq!(div.divergence_type, DivergenceType::NotInSociety);
        assert_eq!(div.detected_count, 2);
        assert_eq!(div.society_count, 0);
        assert_eq!(div.status, DivergenceStatus::Open);
    }

    #[test]
    fn unmatched_entry_yields_single_not_detected() {
        let outcome = reconcile(&[], &[entry("Song", "Band", 4)], &Default::default());
        assert_eq!(outcome.divergences.len(), 1);
        let div = &outcome.divergences[0];
        assert_eq!(div.divergence_type, DivergenceType::NotDetected);
        assert_eq!(div.detected_count, 0);
        assert_eq!(div.society_count, 4);
    }

    #[test]
    fn equal_pair_yields_no_divergence() {
        let mut det = detection("Song", "Band", 3);
        det.value = Some(d("12.50"));
        let mut ent = entry("Song", "Band", 3);
        ent.value = Some(d("12.5"));

        let outcome = reconcile(&[det], &[ent], &Default::default());
        assert!(outcome.divergences.is_empty());
        assert_eq!(outcome.summary.matched_records, 1);
        assert_eq!(outcome.summary.divergent_records, 0);
        assert_eq!(outcome.summary.match_rate, 1.0);
    }

    #[test]
    fn normalized_match_with_count_mismatch() {
        let outcome = reconcile(
            &[detection("X", "Y", 3)],
            &[entry("x", " y ", 5)],
            &Default::default(),
        );
        assert_eq!(outcome.divergences.len(), 1);
        let div = &outcome.divergences[0];
        assert_eq!(div.divergence_type, DivergenceType::CountMismatch);
        assert_eq!(div.detected_count, 3);
        assert_eq!(div.society_count, 5);
    }

    #[test]
    fn value_mismatch_only_when_both_sides_have_value() {
        let mut det = detection("Song", "Band", 1);
        det.value = Some(d("10.00"));
        let mut ent = entry("Song", "Band", 1);
        ent.value = Some(d("8.00"));

        let outcome = reconcile(&[det.clone()], &[ent], &Default::default());
        assert_eq!(outcome.divergences.len(), 1);
        assert_eq!(
            outcome.divergences[0].divergence_type,
            DivergenceType::ValueMismatch
        );

        let outcome = reconcile(&[det], &[entry("Song", "Band", 1)], &Default::default());
        assert!(outcome.divergences.is_empty());
    }

    #[test]
    fn count_and_value_mismatch_both_reported() {
        let mut det = detection("Song", "Band", 2);
        det.value = Some(d("1"));
        let mut ent = entry("Song", "Band", 4);
        ent.value = Some(d("2"));

        let outcome = reconcile(&[det], &[ent], &Default::default());
        let types: Vec<_> = outcome
            .divergences
            .iter()
            .map(|d| d.divergence_type)
            .collect();
        assert_eq!(
            types,
            vec![DivergenceType::CountMismatch, DivergenceType::ValueMismatch]
        );
        assert_eq!(outcome.summary.divergent_records, 1);
    }

    #[test]
    fn detections_with_same_key_are_aggregated() {
        let outcome = reconcile(
            &[
                detection("Song", "Band", 1),
                detection("SONG", "band", 1),
                detection("Song ", "Band", 1),
            ],
            &[entry("song", "band", 3)],
            &Default::default(),
        );
        assert!(outcome.divergences.is_empty());
        assert_eq!(outcome.summary.total_records, 1);
    }

    #[test]
    fn window_narrows_matching() {
        let mut early = detection("Song", "Band", 1);
        early.detected_at = at(2);
        let mut late = detection("Song", "Band", 1);
        late.detected_at = at(20);

        let mut ent = entry("Song", "Band", 1);
        ent.window = Some(TimeWindow {
            start: at(0),
            end: at(6),
        });

        let outcome = reconcile(&[early, late], &[ent], &Default::default());
        assert_eq!(outcome.divergences.len(), 1);
        let div = &outcome.divergences[0];
        assert_eq!(div.divergence_type, DivergenceType::NotInSociety);
        assert_eq!(div.detected_count, 1);
        assert_eq!(outcome.summary.matched_records, 1);
        assert_eq!(outcome.summary.total_records, 2);
    }

    #[test]
    fn rejected_and_low_confidence_are_skipped() {
        let mut rejected = detection("A", "B", 1);
        rejected.status = DetectionStatus::Rejected;
        let mut weak = detection("C", "D", 1);
        weak.confidence = 0.2;

        let config = ReconciliationConfig {
            min_confidence: 0.5,
        };
        let outcome = reconcile(&[rejected, weak], &[], &config);
        assert!(outcome.divergences.is_empty());
        assert_eq!(outcome.summary.skipped_detections, 2);
        assert_eq!(outcome.summary.total_records, 0);
        assert_eq!(outcome.summary.match_rate, 0.0);
    }

    #[test]
    fn summary_counts_mixed_batch() {
        let outcome = reconcile(
            &[
                detection("Match", "A", 1),
                detection("Mismatch", "B", 2),
                detection("Extra", "C", 1),
            ],
            &[
                entry("match", "a", 1),
                entry("mismatch", "b", 5),
                entry("Missing", "D", 7),
            ],
            &Default::default(),
        );
        let s = &outcome.summary;
        assert_eq!(s.total_records, 4);
        assert_eq!(s.matched_records, 2);
        assert_eq!(s.divergent_records, 3);
        assert_eq!(s.match_rate, 0.5);
        assert_eq!(outcome.divergences.len(), 3);
    }

    #[test]
    fn second_entry_for_same_key_is_not_detected() {
        let outcome = reconcile(
            &[detection("Song", "Band", 1)],
            &[entry("Song", "Band", 1), entry("Song", "Band", 1)],
            &Default::default(),
        );
        assert_eq!(outcome.divergences.len(), 1);
        assert_eq!(
            outcome.divergences[0].divergence_type,
            DivergenceType::NotDetected
        );
    }

    #[test]
    fn near_max_play_counts_sum_without_overflow() {
        let outcome = reconcile(
            &[detection("x", "y", u32::MAX), detection("X", "Y", 1)],
            &[entry("x", "y", 5)],
            &Default::default(),
        );
        assert_eq!(outcome.divergences.len(), 1);
        let div = &outcome.divergences[0];
        assert_eq!(div.divergence_type, DivergenceType::CountMismatch);
        assert_eq!(div.detected_count, u64::from(u32::MAX) + 1);
        assert_eq!(div.society_count, 5);
    }

    #[test]
    fn near_max_unreported_plays_sum_without_overflow() {
        let outcome = reconcile(
            &[
                detection("Song", "Band", u32::MAX),
                detection("Song", "Band", u32::MAX),
                detection("Song", "Band", u32::MAX),
            ],
            &[],
            &Default::default(),
        );
        assert_eq!(outcome.divergences.len(), 1);
        assert_eq!(outcome.divergences[0].detected_count, 3 * u64::from(u32::MAX));
    }

    #[test]
    fn match_rate_zero_total() {
        assert_eq!(match_rate(0, 0), 0.0);
        assert_eq!(match_rate(1, 4), 0.25);
    }

    #[test]
    fn detection_deserializes_with_defaults() {
        let det: ExecutionDetection = serde_json::from_value(serde_json::json!({
            "title": "Song",
            "artist": "Band",
            "detected_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(det.play_count, 1);
        assert_eq!(det.status, DetectionStatus::Detected);
        assert_eq!(det.confidence, 1.0);
    }

    // -- transition ----------------------------------------------------------

    #[test]
    fn open_can_be_resolved_or_disputed() {
        assert_eq!(
            transition(DivergenceStatus::Open, DivergenceStatus::Resolved).unwrap(),
            DivergenceStatus::Resolved
        );
        assert!(transition(DivergenceStatus::Open, DivergenceStatus::Disputed).is_ok());
    }

    #[test]
    fn disputed_can_be_resolved_or_reopened() {
        assert!(transition(DivergenceStatus::Disputed, DivergenceStatus::Resolved).is_ok());
        assert!(transition(DivergenceStatus::Disputed, DivergenceStatus::Open).is_ok());
    }

    #[test]
    fn resolved_is_terminal() {
        for to in [
            DivergenceStatus::Open,
            DivergenceStatus::Disputed,
            DivergenceStatus::Resolved,
        ] {
            assert!(transition(DivergenceStatus::Resolved, to).is_err());
        }
    }

    #[test]
    fn open_to_open_rejected() {
        let err = transition(DivergenceStatus::Open, DivergenceStatus::Open).unwrap_err();
        assert!(err.to_string().contains("Cannot move divergence"));
    }

    // -- status strings ------------------------------------------------------

    #[test]
    fn divergence_type_round_trip() {
        for s in VALID_DIVERGENCE_TYPES {
            assert_eq!(DivergenceType::from_str_value(s).unwrap().as_str(), *s);
        }
        assert!(DivergenceType::from_str_value("other").is_err());
    }

    #[test]
    fn divergence_status_round_trip() {
        for s in VALID_DIVERGENCE_STATUSES {
            assert_eq!(DivergenceStatus::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn detection_status_round_trip() {
        for s in VALID_DETECTION_STATUSES {
            assert_eq!(DetectionStatus::from_str_value(s).unwrap().as_str(), *s);
        }
    }
}
