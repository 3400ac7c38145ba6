//! Repository for the `phonograms` and `phonogram_participants` tables.

use rightsdesk_core::shares::Participant;
use rightsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::phonogram::{
    CreatePhonogram, Phonogram, PhonogramParticipant, UpdatePhonogram,
};

const COLUMNS: &str = "id, work_id, title, isrc, status, audio_url, created_at, updated_at";

const PARTICIPANT_COLUMNS: &str = "id, phonogram_id, name, role, percentage, sort_order";

/// Provides CRUD operations for phonograms.
pub struct PhonogramRepo;

impl PhonogramRepo {
    /// Insert a new phonogram. `status` defaults to `pending`.
    ///
    /// A duplicate ISRC violates `uq_phonograms_isrc`.
    pub async fn create(pool: &PgPool, input: &CreatePhonogram) -> Result<Phonogram, sqlx::Error> {
        let query = format!(
            "INSERT INTO phonograms (work_id, title, isrc, status)
             VALUES ($1, $2, $3, COALESCE($4, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(input.work_id)
            .bind(&input.title)
            .bind(&input.isrc)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Phonogram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phonograms WHERE id = $1");
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Phonogram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phonograms ORDER BY title, id");
        sqlx::query_as::<_, Phonogram>(&query).fetch_all(pool).await
    }

    pub async fn list_by_work(pool: &PgPool, work_id: DbId) -> Result<Vec<Phonogram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phonograms WHERE work_id = $1 ORDER BY id");
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// Phonograms referencing any of the given works.
    pub async fn list_by_work_ids(
        pool: &PgPool,
        work_ids: &[DbId],
    ) -> Result<Vec<Phonogram>, sqlx::Error> {
        if work_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM phonograms WHERE work_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(work_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a phonogram. Only non-`None` fields in `input` are applied;
    /// `clear_isrc` sets the identifier back to NULL.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePhonogram,
    ) -> Result<Option<Phonogram>, sqlx::Error> {
        let query = format!(
            "UPDATE phonograms SET
                title = COALESCE($2, title),
                isrc = CASE WHEN $5 THEN NULL ELSE COALESCE($3, isrc) END,
                status = COALESCE($4, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.isrc)
            .bind(&input.status)
            .bind(input.clear_isrc)
            .fetch_optional(pool)
            .await
    }

    /// Store the public URL returned by the blob store.
    pub async fn set_audio_url(
        pool: &PgPool,
        id: DbId,
        audio_url: &str,
    ) -> Result<Option<Phonogram>, sqlx::Error> {
        let query =
            format!("UPDATE phonograms SET audio_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Phonogram>(&query)
            .bind(id)
            .bind(audio_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM phonograms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_participants(
        pool: &PgPool,
        phonogram_id: DbId,
    ) -> Result<Vec<PhonogramParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM phonogram_participants
             WHERE phonogram_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, PhonogramParticipant>(&query)
            .bind(phonogram_id)
            .fetch_all(pool)
            .await
    }

    /// Contributors of several phonograms, ordered by phonogram then position.
    pub async fn list_participants_by_phonogram_ids(
        pool: &PgPool,
        phonogram_ids: &[DbId],
    ) -> Result<Vec<PhonogramParticipant>, sqlx::Error> {
        if phonogram_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM phonogram_participants
             WHERE phonogram_id = ANY($1) ORDER BY phonogram_id, sort_order, id"
        );
        sqlx::query_as::<_, PhonogramParticipant>(&query)
            .bind(phonogram_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace all contributors of a phonogram in one transaction.
    pub async fn replace_participants(
        pool: &PgPool,
        phonogram_id: DbId,
        participants: &[Participant],
    ) -> Result<Vec<PhonogramParticipant>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM phonogram_participants WHERE phonogram_id = $1")
            .bind(phonogram_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO phonogram_participants (phonogram_id, name, role, percentage, sort_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PARTICIPANT_COLUMNS}"
        );
        let mut rows = Vec::with_capacity(participants.len());
        for (i, p) in participants.iter().enumerate() {
            let row = sqlx::query_as::<_, PhonogramParticipant>(&query)
                .bind(phonogram_id)
                .bind(&p.name)
                .bind(p.role.as_str())
                .bind(p.percentage)
                .bind(i as i32)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }
}
