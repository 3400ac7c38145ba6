//! Revenue-share allocation among phonogram contributors.
//!
//! Three independent category ledgers (producers, performers, musicians)
//! each have a fixed ceiling. The checks here are advisory: callers get a
//! typed classification and decide through [`SharePolicy`] whether an
//! over-cap allocation may still be saved.
//!
//! All arithmetic uses [`Decimal`]; rounding to two places happens only
//! for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Ceiling for the phonographic producer ledger (41.70%).
pub const PRODUCER_CAP: Decimal = Decimal::from_parts(4170, 0, 0, false, 2);

/// Ceiling for the performer ledger (41.70%).
pub const PERFORMER_CAP: Decimal = Decimal::from_parts(4170, 0, 0, false, 2);

/// Ceiling for the musician ledger (16.60%).
pub const MUSICIAN_CAP: Decimal = Decimal::from_parts(1660, 0, 0, false, 2);

/// Sum of all three ceilings (100.00%).
pub const TOTAL_CAP: Decimal = Decimal::from_parts(10000, 0, 0, false, 2);

/// Totals closer to a cap than this are reported as at the cap.
pub const CAP_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places used when presenting totals.
pub const DISPLAY_SCALE: u32 = 2;

/// Maximum contributor name length.
pub const MAX_NAME_LENGTH: u64 = 200;

pub const ROLE_PHONOGRAPHIC_PRODUCER: &str = "phonographic_producer";
pub const ROLE_PERFORMER: &str = "performer";
pub const ROLE_MUSICIAN: &str = "musician";

/// All valid phonogram contributor roles.
pub const VALID_ROLES: &[&str] = &[ROLE_PHONOGRAPHIC_PRODUCER, ROLE_PERFORMER, ROLE_MUSICIAN];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the three share ledgers on a phonogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareCategory {
    Producers,
    Performers,
    Musicians,
}

impl ShareCategory {
    /// Every category in ledger order.
    pub const ALL: [ShareCategory; 3] = [Self::Producers, Self::Performers, Self::Musicians];

    /// The fixed ceiling for this category.
    pub fn cap(&self) -> Decimal {
        match self {
            Self::Producers => PRODUCER_CAP,
            Self::Performers => PERFORMER_CAP,
            Self::Musicians => MUSICIAN_CAP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producers => "producers",
            Self::Performers => "performers",
            Self::Musicians => "musicians",
        }
    }
}

/// Role of a contributor on a phonogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    PhonographicProducer,
    Performer,
    Musician,
}

impl ParticipantRole {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_PHONOGRAPHIC_PRODUCER => Ok(Self::PhonographicProducer),
            ROLE_PERFORMER => Ok(Self::Performer),
            ROLE_MUSICIAN => Ok(Self::Musician),
            _ => Err(format!(
                "Invalid participant role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhonographicProducer => ROLE_PHONOGRAPHIC_PRODUCER,
            Self::Performer => ROLE_PERFORMER,
            Self::Musician => ROLE_MUSICIAN,
        }
    }

    /// The ledger this role's shares are counted against.
    pub fn category(&self) -> ShareCategory {
        match self {
            Self::PhonographicProducer => ShareCategory::Producers,
            Self::Performer => ShareCategory::Performers,
            Self::Musician => ShareCategory::Musicians,
        }
    }
}

/// Where a category total sits relative to its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStatus {
    Ok,
    AtCap,
    OverCap,
}

/// Typed validation result, usable on both sides of the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum ShareCheck {
    Ok,
    CapExceeded {
        category: ShareCategory,
        total: Decimal,
    },
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// A contributor's declared share on a phonogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Participant {
    #[validate(length(max = MAX_NAME_LENGTH, message = "name is too long"))]
    pub name: String,
    pub role: ParticipantRole,
    #[validate(custom(function = "validate_percentage_range"))]
    pub percentage: Decimal,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: ParticipantRole, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            role,
            percentage,
        }
    }

    /// Rows without a name are placeholders and never count towards totals.
    pub fn counts_towards_total(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Per-category view for display next to the edit form.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: ShareCategory,
    pub total: Decimal,
    pub cap: Decimal,
    pub status: CapStatus,
}

/// Running totals across all three ledgers.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationSummary {
    pub categories: Vec<CategoryTotal>,
    pub aggregate_total: Decimal,
    /// e.g. `"41.70/100"`.
    pub aggregate_label: String,
    pub check: ShareCheck,
}

/// Whether an over-cap allocation blocks persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePolicy {
    pub block_over_cap: bool,
}

// ---------------------------------------------------------------------------
// Totals and classification
// ---------------------------------------------------------------------------

/// Sum of percentages, ignoring rows with an empty name.
pub fn category_total(participants: &[Participant]) -> Decimal {
    participants
        .iter()
        .filter(|p| p.counts_towards_total())
        .map(|p| p.percentage)
        .sum()
}

/// Sum across all three ledgers.
pub fn aggregate_total(
    producers: &[Participant],
    performers: &[Participant],
    musicians: &[Participant],
) -> Decimal {
    category_total(producers) + category_total(performers) + category_total(musicians)
}

/// Classify a category total against its cap.
pub fn classify(total: Decimal, cap: Decimal) -> CapStatus {
    if (total - cap).abs() < CAP_TOLERANCE {
        CapStatus::AtCap
    } else if total < cap {
        CapStatus::Ok
    } else {
        CapStatus::OverCap
    }
}

/// Check one ledger against its ceiling.
pub fn check_category(category: ShareCategory, participants: &[Participant]) -> ShareCheck {
    let total = category_total(participants);
    match classify(total, category.cap()) {
        CapStatus::OverCap => ShareCheck::CapExceeded {
            category,
            total: total.round_dp(DISPLAY_SCALE),
        },
        CapStatus::Ok | CapStatus::AtCap => ShareCheck::Ok,
    }
}

/// Check all three ledgers, reporting the first one over its cap.
pub fn validate_allocation(
    producers: &[Participant],
    performers: &[Participant],
    musicians: &[Participant],
) -> ShareCheck {
    [
        (ShareCategory::Producers, producers),
        (ShareCategory::Performers, performers),
        (ShareCategory::Musicians, musicians),
    ]
    .into_iter()
    .map(|(category, list)| check_category(category, list))
    .find(|check| *check != ShareCheck::Ok)
    .unwrap_or(ShareCheck::Ok)
}

/// Build the running-total view for all three ledgers.
pub fn summarize(
    producers: &[Participant],
    performers: &[Participant],
    musicians: &[Participant],
) -> AllocationSummary {
    let categories = [
        (ShareCategory::Producers, producers),
        (ShareCategory::Performers, performers),
        (ShareCategory::Musicians, musicians),
    ]
    .into_iter()
    .map(|(category, list)| {
        let total = category_total(list);
        CategoryTotal {
            category,
            total: total.round_dp(DISPLAY_SCALE),
            cap: category.cap(),
            status: classify(total, category.cap()),
        }
    })
    .collect();

    let aggregate = aggregate_total(producers, performers, musicians).round_dp(DISPLAY_SCALE);

    AllocationSummary {
        categories,
        aggregate_total: aggregate,
        aggregate_label: format!(
            "{}/{}",
            format_display(aggregate),
            TOTAL_CAP.round_dp(0).normalize()
        ),
        check: validate_allocation(producers, performers, musicians),
    }
}

/// Partition a flat contributor list into the three ledgers.
pub fn split_by_category(
    participants: &[Participant],
) -> (Vec<Participant>, Vec<Participant>, Vec<Participant>) {
    let mut producers = Vec::new();
    let mut performers = Vec::new();
    let mut musicians = Vec::new();

    for p in participants {
        match p.role.category() {
            ShareCategory::Producers => producers.push(p.clone()),
            ShareCategory::Performers => performers.push(p.clone()),
            ShareCategory::Musicians => musicians.push(p.clone()),
        }
    }

    (producers, performers, musicians)
}

/// Apply the save policy to a check result.
pub fn enforce(policy: SharePolicy, check: &ShareCheck) -> Result<(), CoreError> {
    match check {
        ShareCheck::CapExceeded { category, total } if policy.block_over_cap => {
            Err(CoreError::Validation(format!(
                "{} total {} exceeds cap {}",
                category.as_str(),
                format_display(*total),
                format_display(category.cap())
            )))
        }
        _ => Ok(()),
    }
}

/// Format with exactly two decimal places.
pub fn format_display(value: Decimal) -> String {
    let mut rounded = value.round_dp(DISPLAY_SCALE);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

fn validate_percentage_range(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("percentage must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

/// Validate a single contributor row (percentage range, name length).
pub fn validate_participant(participant: &Participant) -> Result<(), CoreError> {
    participant.validate().map_err(CoreError::from)
}

/// Validate every row, prefixing the failing field with its index.
pub fn validate_participants(participants: &[Participant]) -> Result<(), CoreError> {
    for (i, p) in participants.iter().enumerate() {
        validate_participant(p).map_err(|e| match e {
            CoreError::InvalidField { field, message } => CoreError::InvalidField {
                field: format!("participants[{i}].{field}"),
                message,
            },
            other => other,
        })?;
    }
    Ok(())
}
