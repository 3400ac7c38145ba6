//! Canonical lifecycle tag for a project.
//!
//! Project, Work, Phonogram and Release each carry their own status and
//! nothing keeps them consistent in storage. The tag shown for a project
//! is reconstructed here from a read-only [`RegistrationView`] by walking
//! [`LIFECYCLE_RULES`] in order; the first matching rule wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PROJECT_DRAFT: &str = "draft";
pub const PROJECT_IN_PROGRESS: &str = "in_progress";
pub const PROJECT_COMPLETED: &str = "completed";
pub const PROJECT_CANCELLED: &str = "cancelled";

/// All valid project status strings.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_DRAFT,
    PROJECT_IN_PROGRESS,
    PROJECT_COMPLETED,
    PROJECT_CANCELLED,
];

pub const RELEASE_PLANNED: &str = "planned";
pub const RELEASE_SCHEDULED: &str = "scheduled";
pub const RELEASE_RELEASED: &str = "released";
pub const RELEASE_WITHDRAWN: &str = "withdrawn";

/// All valid release status strings.
pub const VALID_RELEASE_STATUSES: &[&str] = &[
    RELEASE_PLANNED,
    RELEASE_SCHEDULED,
    RELEASE_RELEASED,
    RELEASE_WITHDRAWN,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        Self::Draft,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            PROJECT_DRAFT => Ok(Self::Draft),
            PROJECT_IN_PROGRESS => Ok(Self::InProgress),
            PROJECT_COMPLETED => Ok(Self::Completed),
            PROJECT_CANCELLED => Ok(Self::Cancelled),
            _ => Err(format!(
                "Invalid project status '{s}'. Must be one of: {}",
                VALID_PROJECT_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => PROJECT_DRAFT,
            Self::InProgress => PROJECT_IN_PROGRESS,
            Self::Completed => PROJECT_COMPLETED,
            Self::Cancelled => PROJECT_CANCELLED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Planned,
    Scheduled,
    Released,
    Withdrawn,
}

impl ReleaseStatus {
    pub const ALL: [ReleaseStatus; 4] = [
        Self::Planned,
        Self::Scheduled,
        Self::Released,
        Self::Withdrawn,
    ];

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            RELEASE_PLANNED => Ok(Self::Planned),
            RELEASE_SCHEDULED => Ok(Self::Scheduled),
            RELEASE_RELEASED => Ok(Self::Released),
            RELEASE_WITHDRAWN => Ok(Self::Withdrawn),
            _ => Err(format!(
                "Invalid release status '{s}'. Must be one of: {}",
                VALID_RELEASE_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => RELEASE_PLANNED,
            Self::Scheduled => RELEASE_SCHEDULED,
            Self::Released => RELEASE_RELEASED,
            Self::Withdrawn => RELEASE_WITHDRAWN,
        }
    }
}

/// The single status shown for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleTag {
    Released,
    PendingRelease,
    Cancelled,
    PendingWorkRegistration,
    InProgress,
    Draft,
}

impl LifecycleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Released => "released",
            Self::PendingRelease => "pending_release",
            Self::Cancelled => "cancelled",
            Self::PendingWorkRegistration => "pending_work_registration",
            Self::InProgress => "in_progress",
            Self::Draft => "draft",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Released => "Released",
            Self::PendingRelease => "Pending Release",
            Self::Cancelled => "Cancelled",
            Self::PendingWorkRegistration => "Pending Work Registration",
            Self::InProgress => "In Progress",
            Self::Draft => "Draft",
        }
    }
}

// ---------------------------------------------------------------------------
// Registration view
// ---------------------------------------------------------------------------

/// Joined, read-only snapshot of one project's registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationView {
    pub project_status: ProjectStatus,
    pub has_work: bool,
    pub has_phonogram_linked_to_work: bool,
    pub release_status: ReleaseStatus,
}

impl RegistrationView {
    /// Assemble the view from the rows fetched for a project.
    ///
    /// A phonogram only counts when its `work_id` points at one of the
    /// project's works. Any released release makes the project released;
    /// otherwise the first release's status is used, or `Planned` when
    /// there are none.
    pub fn assemble(
        project_status: ProjectStatus,
        work_ids: &[DbId],
        phonogram_work_ids: &[DbId],
        release_statuses: &[ReleaseStatus],
    ) -> Self {
        let has_work = !work_ids.is_empty();
        let has_phonogram_linked_to_work = phonogram_work_ids
            .iter()
            .any(|work_id| work_ids.contains(work_id));

        let release_status = if release_statuses.contains(&ReleaseStatus::Released) {
            ReleaseStatus::Released
        } else {
            release_statuses
                .first()
                .copied()
                .unwrap_or(ReleaseStatus::Planned)
        };

        Self {
            project_status,
            has_work,
            has_phonogram_linked_to_work,
            release_status,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// One row of the decision table.
pub struct LifecycleRule {
    pub name: &'static str,
    pub applies: fn(&RegistrationView) -> bool,
    pub tag: LifecycleTag,
}

/// Ordered rules; the first one whose predicate holds decides the tag.
///
/// Full registration ranks above cancellation: a cancelled project whose
/// work and phonogram are both registered reports `PendingRelease`.
pub const LIFECYCLE_RULES: &[LifecycleRule] = &[
    LifecycleRule {
        name: "release_published",
        applies: |v| v.release_status == ReleaseStatus::Released,
        tag: LifecycleTag::Released,
    },
    LifecycleRule {
        name: "fully_registered",
        applies: |v| v.has_work && v.has_phonogram_linked_to_work,
        tag: LifecycleTag::PendingRelease,
    },
    LifecycleRule {
        name: "project_cancelled",
        applies: |v| v.project_status == ProjectStatus::Cancelled,
        tag: LifecycleTag::Cancelled,
    },
    LifecycleRule {
        name: "project_completed",
        applies: |v| v.project_status == ProjectStatus::Completed,
        tag: LifecycleTag::PendingWorkRegistration,
    },
    LifecycleRule {
        name: "project_in_progress",
        applies: |v| v.project_status == ProjectStatus::InProgress,
        tag: LifecycleTag::InProgress,
    },
    LifecycleRule {
        name: "fallback",
        applies: |_| true,
        tag: LifecycleTag::Draft,
    },
];

/// Derive the canonical tag for a snapshot.
pub fn derive_tag(view: &RegistrationView) -> LifecycleTag {
    LIFECYCLE_RULES
        .iter()
        .find(|rule| (rule.applies)(view))
        .map(|rule| rule.tag)
        .unwrap_or(LifecycleTag::Draft)
}

/// Same as [`derive_tag`], taking the four inputs directly.
pub fn derive_tag_from(
    project_status: ProjectStatus,
    has_work: bool,
    has_phonogram_linked_to_work: bool,
    release_status: ReleaseStatus,
) -> LifecycleTag {
    derive_tag(&RegistrationView {
        project_status,
        has_work,
        has_phonogram_linked_to_work,
        release_status,
    })
}

/// Names of every rule whose predicate holds, in table order.
pub fn matching_rules(view: &RegistrationView) -> Vec<&'static str> {
    LIFECYCLE_RULES
        .iter()
        .filter(|rule| (rule.applies)(view))
        .map(|rule| rule.name)
        .collect()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Count of projects per tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagSummary {
    pub total: usize,
    pub counts: BTreeMap<LifecycleTag, usize>,
}

pub fn summarize_tags(tags: &[LifecycleTag]) -> TagSummary {
    let mut counts = BTreeMap::new();
    for tag in tags {
        *counts.entry(*tag).or_insert(0) += 1;
    }
    TagSummary {
        total: tags.len(),
        counts,
    }
}
