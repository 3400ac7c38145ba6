//! Commercial releases tied to a project.

use chrono::NaiveDate;
use rightsdesk_core::error::CoreError;
use rightsdesk_core::lifecycle::ReleaseStatus;
use rightsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Release {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub status: String,
    pub release_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Release {
    pub fn release_status(&self) -> Result<ReleaseStatus, CoreError> {
        ReleaseStatus::from_str_value(&self.status).map_err(CoreError::Internal)
    }
}

/// DTO for creating a release; the project comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelease {
    pub title: String,
    /// Defaults to `planned` if omitted.
    pub status: Option<String>,
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRelease {
    pub title: Option<String>,
    pub status: Option<String>,
    pub release_date: Option<NaiveDate>,
}
