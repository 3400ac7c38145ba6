//! Repositories for the `works` and `work_authors` tables.

use rightsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::work::{CreateWork, UpdateWork, Work, WorkAuthor, WorkAuthorInput};

const COLUMNS: &str = "id, project_id, title, iswc, status, created_at, updated_at";

const AUTHOR_COLUMNS: &str = "id, work_id, name, role, percentage, sort_order";

/// Provides CRUD operations for works.
pub struct WorkRepo;

impl WorkRepo {
    /// Insert a new work. `status` defaults to `pending`.
    pub async fn create(pool: &PgPool, input: &CreateWork) -> Result<Work, sqlx::Error> {
        let query = format!(
            "INSERT INTO works (project_id, title, iswc, status)
             VALUES ($1, $2, $3, COALESCE($4, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.iswc)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Work>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM works WHERE id = $1");
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Work>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM works ORDER BY title, id");
        sqlx::query_as::<_, Work>(&query).fetch_all(pool).await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Work>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM works WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Work>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Works belonging to any of the given projects.
    pub async fn list_by_project_ids(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Work>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM works WHERE project_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Work>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Work>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM works WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Work>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a work. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWork,
    ) -> Result<Option<Work>, sqlx::Error> {
        let query = format!(
            "UPDATE works SET
                project_id = COALESCE($2, project_id),
                title = COALESCE($3, title),
                iswc = COALESCE($4, iswc),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.iswc)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a work after removing the phonograms that reference it.
    ///
    /// Both deletes run in one transaction. Returns the number of
    /// phonograms removed, or `None` if the work does not exist.
    pub async fn delete_cascading(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let phonograms_removed = sqlx::query("DELETE FROM phonograms WHERE work_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let works_removed = sqlx::query("DELETE FROM works WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if works_removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        tracing::debug!(work_id = id, phonograms_removed, "Work deleted");
        Ok(Some(phonograms_removed))
    }
}

/// Composer and author credits on a work.
pub struct WorkAuthorRepo;

impl WorkAuthorRepo {
    pub async fn list_by_work(
        pool: &PgPool,
        work_id: DbId,
    ) -> Result<Vec<WorkAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {AUTHOR_COLUMNS} FROM work_authors WHERE work_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, WorkAuthor>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the full author list for a work in one transaction.
    pub async fn replace_for_work(
        pool: &PgPool,
        work_id: DbId,
        authors: &[WorkAuthorInput],
    ) -> Result<Vec<WorkAuthor>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM work_authors WHERE work_id = $1")
            .bind(work_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO work_authors (work_id, name, role, percentage, sort_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {AUTHOR_COLUMNS}"
        );
        let mut rows = Vec::with_capacity(authors.len());
        for (i, author) in authors.iter().enumerate() {
            let row = sqlx::query_as::<_, WorkAuthor>(&query)
                .bind(work_id)
                .bind(&author.name)
                .bind(&author.role)
                .bind(author.percentage)
                .bind(i as i32)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }
}
