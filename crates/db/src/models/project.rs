//! Project entity model and DTOs.

use rightsdesk_core::error::CoreError;
use rightsdesk_core::lifecycle::ProjectStatus;
use rightsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub artist_name: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn project_status(&self) -> Result<ProjectStatus, CoreError> {
        ProjectStatus::from_str_value(&self.status).map_err(CoreError::Internal)
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub artist_name: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub artist_name: Option<String>,
    pub status: Option<String>,
}
