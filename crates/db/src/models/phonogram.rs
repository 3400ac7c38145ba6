//! Sound recording registrations and their contributors.

use rightsdesk_core::error::CoreError;
use rightsdesk_core::shares::{Participant, ParticipantRole};
use rightsdesk_core::types::{DbId, Percentage, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `phonograms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Phonogram {
    pub id: DbId,
    pub work_id: DbId,
    pub title: String,
    pub isrc: Option<String>,
    pub status: String,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhonogram {
    pub work_id: DbId,
    pub title: String,
    pub isrc: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
}

/// `work_id` is not updatable; see `ensure_work_link_unchanged`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePhonogram {
    pub title: Option<String>,
    pub isrc: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub clear_isrc: bool,
}

/// A row from the `phonogram_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhonogramParticipant {
    pub id: DbId,
    pub phonogram_id: DbId,
    pub name: String,
    pub role: String,
    pub percentage: Percentage,
    pub sort_order: i32,
}

impl PhonogramParticipant {
    pub fn to_participant(&self) -> Result<Participant, CoreError> {
        let role = ParticipantRole::from_str_value(&self.role).map_err(CoreError::Internal)?;
        Ok(Participant::new(self.name.clone(), role, self.percentage))
    }
}
