//! Rules for work and phonogram registrations.
//!
//! A phonogram inherits its composers and identifier context from the
//! work it references, so that reference cannot move once set.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const REGISTRATION_PENDING: &str = "pending";
pub const REGISTRATION_SUBMITTED: &str = "submitted";
pub const REGISTRATION_REGISTERED: &str = "registered";
pub const REGISTRATION_REJECTED: &str = "rejected";

/// All valid work / phonogram registration status strings.
pub const VALID_REGISTRATION_STATUSES: &[&str] = &[
    REGISTRATION_PENDING,
    REGISTRATION_SUBMITTED,
    REGISTRATION_REGISTERED,
    REGISTRATION_REJECTED,
];

pub const AUTHOR_COMPOSER: &str = "composer";
pub const AUTHOR_LYRICIST: &str = "author";

/// All valid work author roles.
pub const VALID_AUTHOR_ROLES: &[&str] = &[AUTHOR_COMPOSER, AUTHOR_LYRICIST];

/// Maximum length of a work or phonogram title.
pub const MAX_TITLE_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Registration status shared by works and phonograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Submitted,
    Registered,
    Rejected,
}

impl RegistrationStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            REGISTRATION_PENDING => Ok(Self::Pending),
            REGISTRATION_SUBMITTED => Ok(Self::Submitted),
            REGISTRATION_REGISTERED => Ok(Self::Registered),
            REGISTRATION_REJECTED => Ok(Self::Rejected),
            _ => Err(format!(
                "Invalid registration status '{s}'. Must be one of: {}",
                VALID_REGISTRATION_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => REGISTRATION_PENDING,
            Self::Submitted => REGISTRATION_SUBMITTED,
            Self::Registered => REGISTRATION_REGISTERED,
            Self::Rejected => REGISTRATION_REJECTED,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// A phonogram's `work_id` may be restated but never changed.
pub fn ensure_work_link_unchanged(current: DbId, requested: Option<DbId>) -> Result<(), CoreError> {
    match requested {
        Some(id) if id != current => Err(CoreError::invalid_field(
            "work_id",
            format!("cannot change from {current} to {id}; work link is immutable"),
        )),
        _ => Ok(()),
    }
}

/// Titles must be non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(field: &str, title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::invalid_field(field, "must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::invalid_field(
            field,
            format!("exceeds maximum length of {MAX_TITLE_LENGTH}"),
        ));
    }
    Ok(())
}

/// Validate a status string against an allowed list, reporting the field.
pub fn validate_status(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            field,
            format!("'{value}' is not one of: {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_work_id_is_accepted() {
        assert!(ensure_work_link_unchanged(5, Some(5)).is_ok());
        assert!(ensure_work_link_unchanged(5, None).is_ok());
    }

    #[test]
    fn different_work_id_is_rejected() {
        let err = ensure_work_link_unchanged(5, Some(6)).unwrap_err();
        match err {
            CoreError::InvalidField { field, message } => {
                assert_eq!(field, "work_id");
                assert!(message.contains("immutable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_title_rejected() {
        assert!(validate_title("title", "   ").is_err());
        assert!(validate_title("title", "").is_err());
    }

    #[test]
    fn long_title_rejected() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);
        assert!(validate_title("title", &title).is_err());
        assert!(validate_title("title", &title[1..]).is_ok());
    }

    #[test]
    fn status_validation_names_field() {
        let err = validate_status("status", "archived", VALID_REGISTRATION_STATUSES).unwrap_err();
        assert!(err.to_string().contains("Invalid status"));
        assert!(validate_status("status", "registered", VALID_REGISTRATION_STATUSES).is_ok());
    }

    #[test]
    fn registration_status_round_trip() {
        for s in VALID_REGISTRATION_STATUSES {
            assert_eq!(RegistrationStatus::from_str_value(s).unwrap().as_str(), *s);
        }
    }
}
