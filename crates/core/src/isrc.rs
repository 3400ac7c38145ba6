//! Structured recording identifiers (ISRC-style).
//!
//! An identifier is four dash-separated parts: country, registrant, year
//! and designation, e.g. `BR-ABC-23-00001`. Parsing is lenient and never
//! fails; composing a fully blank identifier yields `None` so that the
//! store holds NULL rather than a placeholder.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Country code assumed when an identifier is absent or malformed.
pub const DEFAULT_COUNTRY: &str = "BR";

/// Separator between identifier parts.
pub const SEPARATOR: char = '-';

/// Number of parts in a well-formed identifier.
pub const PART_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// The four parts of a recording identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrcParts {
    pub country: String,
    pub registrant: String,
    pub year: String,
    pub designation: String,
}

impl Default for IsrcParts {
    /// The blank sentinel: default country, everything else empty.
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            registrant: String::new(),
            year: String::new(),
            designation: String::new(),
        }
    }
}

impl IsrcParts {
    pub fn new(
        country: impl Into<String>,
        registrant: impl Into<String>,
        year: impl Into<String>,
        designation: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            registrant: registrant.into(),
            year: year.into(),
            designation: designation.into(),
        }
    }

    /// Whether these parts equal the blank sentinel.
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    fn named_parts(&self) -> [(&'static str, &str); PART_COUNT] {
        [
            ("country", &self.country),
            ("registrant", &self.registrant),
            ("year", &self.year),
            ("designation", &self.designation),
        ]
    }
}

// ---------------------------------------------------------------------------
// Parse / compose
// ---------------------------------------------------------------------------

/// Split an identifier into its parts.
///
/// Absent input or fewer than four segments yields the blank sentinel.
/// Segments past the fourth are ignored.
pub fn parse(identifier: Option<&str>) -> IsrcParts {
    let Some(raw) = identifier else {
        return IsrcParts::default();
    };

    let segments: Vec<&str> = raw.split(SEPARATOR).collect();
    if segments.len() < PART_COUNT {
        return IsrcParts::default();
    }

    IsrcParts::new(segments[0], segments[1], segments[2], segments[3])
}

/// Join the four parts with `-`.
///
/// Returns `None` when the composed value is the blank sentinel.
pub fn compose(parts: &IsrcParts) -> Option<String> {
    let composed = parts
        .named_parts()
        .iter()
        .map(|(_, value)| *value)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string());

    if composed == blank_identifier() {
        None
    } else {
        Some(composed)
    }
}

/// The composed form of the blank sentinel (`"BR---"`).
fn blank_identifier() -> String {
    format!("{DEFAULT_COUNTRY}{SEPARATOR}{SEPARATOR}{SEPARATOR}")
}

/// Reject parts that would not survive a parse/compose round trip.
pub fn validate_parts(parts: &IsrcParts) -> Result<(), CoreError> {
    for (name, value) in parts.named_parts() {
        if value.contains(SEPARATOR) {
            return Err(CoreError::invalid_field(
                format!("isrc.{name}"),
                format!("must not contain '{SEPARATOR}'"),
            ));
        }
    }
    Ok(())
}
