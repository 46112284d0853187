//! Async job worker: drives one queued generation job to a terminal state.

use database::{job, Job};
use serde_json::Value;
use tracing::{error, info};

use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::prompts::Speed;

/// Run one generation job end to end.
///
/// Marks the job running, invokes the orchestrator, and records the outcome
/// on the job. The orchestrator's own failure handling covers the post
/// record; this covers the job record. Safe to re-invoke for a job whose
/// earlier run died mid-flight.
pub async fn run_generation_job(
    orchestrator: &Orchestrator,
    job_id: i64,
    task_id: &str,
) -> Result<Job> {
    let pool = orchestrator.database().pool();
    let job = job::mark_running(pool, job_id, task_id).await?;

    info!(job_id, task_id, topic = %job.topic, "generation job started");

    let context: Value =
        serde_json::from_str(&job.additional_context).unwrap_or_else(|_| Value::Object(Default::default()));
    let speed = Speed::parse(&job.speed);

    match orchestrator
        .generate(&job.topic, &job.persona_slug, &context, speed)
        .await
    {
        Ok(post) => {
            let job = job::complete_job(pool, job_id, post.id).await?;
            info!(job_id, post_id = post.id, "generation job completed");
            Ok(job)
        }
        Err(err) => {
            error!(job_id, error = %err, "generation job failed");
            job::fail_job(pool, job_id, &err.to_string()).await?;
            Err(err)
        }
    }
}
