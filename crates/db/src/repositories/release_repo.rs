//! Repository for the `releases` table.

use rightsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::release::{CreateRelease, Release, UpdateRelease};

const COLUMNS: &str = "id, project_id, title, status, release_date, created_at, updated_at";

pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a release for a project. `status` defaults to `planned`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRelease,
    ) -> Result<Release, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases (project_id, title, status, release_date)
             VALUES ($1, $2, COALESCE($3, 'planned'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.release_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Release>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Releases belonging to any of the given projects.
    pub async fn list_by_project_ids(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Release>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query =
            format!("SELECT {COLUMNS} FROM releases WHERE project_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Release>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET
                title = COALESCE($2, title),
                status = COALESCE($3, status),
                release_date = COALESCE($4, release_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.release_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
