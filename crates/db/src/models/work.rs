//! Musical work registrations and their authors.

use rightsdesk_core::types::{DbId, Percentage, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `works` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Work {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub title: String,
    pub iswc: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWork {
    pub project_id: Option<DbId>,
    pub title: String,
    pub iswc: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWork {
    pub project_id: Option<DbId>,
    pub title: Option<String>,
    pub iswc: Option<String>,
    pub status: Option<String>,
}

/// A composer or author credited on a work.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkAuthor {
    pub id: DbId,
    pub work_id: DbId,
    pub name: String,
    pub role: String,
    pub percentage: Percentage,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkAuthorInput {
    pub name: String,
    pub role: String,
    pub percentage: Percentage,
}
