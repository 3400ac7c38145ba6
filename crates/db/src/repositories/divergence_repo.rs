//! Repository for the `divergences` table.

use std::collections::HashSet;

use rightsdesk_core::reconciliation::{normalize_key, Divergence, DivergenceStatus, MatchKey};
use rightsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::divergence::DivergenceRecord;

const COLUMNS: &str = "id, report_id, divergence_type, title, artist, detected_count, \
    society_count, detected_value, society_value, status, resolution_note, resolved_at, \
    created_at, updated_at";

pub struct DivergenceRepo;

impl DivergenceRepo {
    /// Replace a report's open divergences with a fresh reconciliation run.
    ///
    /// Resolved and disputed rows from earlier runs are kept, and a new
    /// divergence with the same type and normalized title/artist as one of
    /// them is not inserted again.
    pub async fn replace_open_for_report(
        pool: &PgPool,
        report_id: DbId,
        divergences: &[Divergence],
    ) -> Result<Vec<DivergenceRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let cleared =
            sqlx::query("DELETE FROM divergences WHERE report_id = $1 AND status = 'open'")
                .bind(report_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        let reviewed: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT divergence_type, title, artist FROM divergences
             WHERE report_id = $1 AND status IN ('resolved', 'disputed')",
        )
        .bind(report_id)
        .fetch_all(&mut *tx)
        .await?;
        let reviewed: HashSet<(String, MatchKey)> = reviewed
            .into_iter()
            .map(|(kind, title, artist)| (kind, normalize_key(&title, &artist)))
            .collect();

        let query = format!(
            "INSERT INTO divergences
                (report_id, divergence_type, title, artist, detected_count, society_count,
                 detected_value, society_value, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(divergences.len());
        let mut kept_reviewed = 0usize;
        for d in divergences {
            let key = (
                d.divergence_type.as_str().to_string(),
                normalize_key(&d.title, &d.artist),
            );
            if reviewed.contains(&key) {
                kept_reviewed += 1;
                continue;
            }

            let row = sqlx::query_as::<_, DivergenceRecord>(&query)
                .bind(report_id)
                .bind(d.divergence_type.as_str())
                .bind(&d.title)
                .bind(&d.artist)
                .bind(i64::try_from(d.detected_count).unwrap_or(i64::MAX))
                .bind(i64::try_from(d.society_count).unwrap_or(i64::MAX))
                .bind(d.detected_value)
                .bind(d.society_value)
                .bind(d.status.as_str())
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        tracing::debug!(
            report_id,
            cleared,
            kept_reviewed,
            inserted = rows.len(),
            "Divergences replaced"
        );
        Ok(rows)
    }

    pub async fn list_by_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<DivergenceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM divergences WHERE report_id = $1 ORDER BY id");
        sqlx::query_as::<_, DivergenceRecord>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DivergenceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM divergences WHERE id = $1");
        sqlx::query_as::<_, DivergenceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the status; `resolved_at` is stamped when moving to `resolved`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: DivergenceStatus,
        resolution_note: Option<&str>,
    ) -> Result<Option<DivergenceRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE divergences SET
                status = $2,
                resolution_note = COALESCE($3, resolution_note),
                resolved_at = CASE WHEN $2 = 'resolved' THEN NOW() ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DivergenceRecord>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(resolution_note)
            .fetch_optional(pool)
            .await
    }
}
