//! Repository for the `society_reports` and `society_report_entries` tables.

use rightsdesk_core::reconciliation::ReconciliationSummary;
use rightsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::society_report::{CreateSocietyReport, SocietyReport, SocietyReportEntry};

const COLUMNS: &str = "id, society, period_start, period_end, total_records, matched_records, \
    divergent_records, reconciled_at, created_at";

const ENTRY_COLUMNS: &str =
    "id, report_id, title, artist, play_count, value, window_start, window_end";

pub struct SocietyReportRepo;

impl SocietyReportRepo {
    /// Insert a report header and all of its entries in one transaction.
    ///
    /// `total_records` starts as the number of entries filed.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSocietyReport,
    ) -> Result<SocietyReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO society_reports (society, period_start, period_end, total_records)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, SocietyReport>(&query)
            .bind(&input.society)
            .bind(input.period_start)
            .bind(input.period_end)
            .bind(input.entries.len() as i32)
            .fetch_one(&mut *tx)
            .await?;

        for entry in &input.entries {
            sqlx::query(
                "INSERT INTO society_report_entries
                    (report_id, title, artist, play_count, value, window_start, window_end)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(report.id)
            .bind(&entry.title)
            .bind(&entry.artist)
            .bind(entry.play_count)
            .bind(entry.value)
            .bind(entry.window_start)
            .bind(entry.window_end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(report)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SocietyReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM society_reports WHERE id = $1");
        sqlx::query_as::<_, SocietyReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_entries(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<SocietyReportEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM society_report_entries WHERE report_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, SocietyReportEntry>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    /// Store the counters from a reconciliation run.
    pub async fn record_summary(
        pool: &PgPool,
        id: DbId,
        summary: &ReconciliationSummary,
    ) -> Result<Option<SocietyReport>, sqlx::Error> {
        let query = format!(
            "UPDATE society_reports SET
                total_records = $2,
                matched_records = $3,
                divergent_records = $4,
                reconciled_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocietyReport>(&query)
            .bind(id)
            .bind(summary.total_records as i32)
            .bind(summary.matched_records as i32)
            .bind(summary.divergent_records as i32)
            .fetch_optional(pool)
            .await
    }
}
