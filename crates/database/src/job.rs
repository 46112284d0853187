//! Generation job queries.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::Job;

/// Parameters for a new queued job.
pub struct NewJob<'a> {
    pub topic: &'a str,
    pub persona_slug: &'a str,
    pub session_id: &'a str,
    pub speed: &'a str,
    pub additional_context: &'a Value,
}

/// Insert a job in `queued` status.
pub async fn create_job(pool: &SqlitePool, new: NewJob<'_>) -> Result<Job> {
    let job = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (topic, persona_slug, session_id, speed, additional_context)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new.topic)
    .bind(new.persona_slug)
    .bind(new.session_id)
    .bind(new.speed)
    .bind(new.additional_context.to_string())
    .fetch_one(pool)
    .await?;

    debug!(job_id = job.id, topic = %job.topic, "queued generation job");

    Ok(job)
}

/// Fetch a job by ID.
pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<Job> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "job",
            id: id.to_string(),
        })
}

/// Move a job to `running`. Progress never decreases, so a retried job keeps
/// any progress it already reported.
pub async fn mark_running(pool: &SqlitePool, id: i64, task_id: &str) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET status = 'running',
            progress = MAX(progress, 10),
            task_id = ?,
            error_message = '',
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(task_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "job",
        id: id.to_string(),
    })
}

/// Report intermediate progress. Lower values than the stored one are ignored.
pub async fn update_progress(pool: &SqlitePool, id: i64, progress: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET progress = MAX(progress, ?), updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(progress.clamp(0, 100))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Complete a job, linking it to the post it produced.
pub async fn complete_job(pool: &SqlitePool, id: i64, post_id: i64) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET status = 'completed',
            progress = 100,
            post_id = ?,
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(post_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "job",
        id: id.to_string(),
    })
}

/// Fail a job with an error message.
pub async fn fail_job(pool: &SqlitePool, id: i64, error: &str) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET status = 'failed',
            progress = 100,
            error_message = ?,
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(error)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "job",
        id: id.to_string(),
    })
}
