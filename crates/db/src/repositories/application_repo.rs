//! Repository for the `task_applications` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::Application;

/// Column list for `task_applications` queries.
const APPLICATION_COLUMNS: &str =
    "id, task_id, professional_id, status, message, created_at, updated_at";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Apply to a task. New applications always start out pending.
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        professional_id: Uuid,
        message: Option<&str>,
    ) -> Result<Application, sqlx::Error> {
        let sql = format!(
            "INSERT INTO task_applications (task_id, professional_id, message) \
             VALUES ($1, $2, $3) \
             RETURNING {APPLICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&sql)
            .bind(task_id)
            .bind(professional_id)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// Count the applications still pending for a task -- the badge shown
    /// to the task owner.
    pub async fn count_pending(pool: &PgPool, task_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_applications WHERE task_id = $1 AND status = 'pending'",
        )
        .bind(task_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a professional has already applied to a task.
    pub async fn exists_for(
        pool: &PgPool,
        task_id: Uuid,
        professional_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_applications \
             WHERE task_id = $1 AND professional_id = $2",
        )
        .bind(task_id)
        .bind(professional_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
