//! Repository for the `execution_detections` table.

use rightsdesk_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::detection::{CreateDetection, Detection};

const COLUMNS: &str =
    "id, title, artist, station, detected_at, confidence, status, play_count, value, created_at";

pub struct DetectionRepo;

impl DetectionRepo {
    /// Insert a detection. Confidence defaults to 1.0, status to
    /// `detected`, play count to 1.
    pub async fn create(pool: &PgPool, input: &CreateDetection) -> Result<Detection, sqlx::Error> {
        let query = format!(
            "INSERT INTO execution_detections
                (title, artist, station, detected_at, confidence, status, play_count, value)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1.0), COALESCE($6, 'detected'),
                     COALESCE($7, 1), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.station)
            .bind(input.detected_at)
            .bind(input.confidence)
            .bind(&input.status)
            .bind(input.play_count)
            .bind(input.value)
            .fetch_one(pool)
            .await
    }

    /// Detections whose `detected_at` falls inside `[start, end]`.
    pub async fn list_in_period(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Detection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM execution_detections
             WHERE detected_at BETWEEN $1 AND $2
             ORDER BY detected_at, id"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
