//! Generation submission and job polling endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{job, JobStatus};
use generation::{worker, Speed};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::routes::posts::PostResponse;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub persona: String,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub additional_context: Option<Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateQuery {
    /// Run inline and return the post instead of queueing a job.
    #[serde(default)]
    pub sync: Option<bool>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Queued { job_id: i64, status: JobStatus },
    Inline(Box<PostResponse>),
}

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: i64,
    pub status: JobStatus,
    pub progress: i64,
    pub post_id: Option<i64>,
    pub error: Option<String>,
}

/// Submit a generation request.
///
/// The default path queues a job and returns 202 immediately; `?sync=true`
/// runs the orchestrator inline and returns the completed post with 201.
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>)> {
    let speed_raw = request.speed.unwrap_or_else(|| "fast".to_string());
    let context = request.additional_context.unwrap_or_else(|| Value::Object(Default::default()));

    if query.sync.unwrap_or(false) {
        let post = state
            .orchestrator
            .generate(
                &request.topic,
                &request.persona,
                &context,
                Speed::parse(&speed_raw),
            )
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(GenerateResponse::Inline(Box::new(post.into()))),
        ));
    }

    // Reject malformed requests before a job row exists.
    generation::orchestrator::validate_input(&request.topic, &request.persona)?;

    let queued = job::create_job(
        state.db.pool(),
        job::NewJob {
            topic: &request.topic,
            persona_slug: &request.persona,
            session_id: request.session_id.as_deref().unwrap_or(""),
            speed: &speed_raw,
            additional_context: &context,
        },
    )
    .await?;

    let orchestrator = state.orchestrator.clone();
    let job_id = queued.id;
    let task_id = Uuid::new_v4().to_string();
    info!(job_id, task_id = %task_id, "spawning generation task");

    tokio::spawn(async move {
        // Outcome is recorded on the job row; nothing to do with the result.
        let _ = worker::run_generation_job(&orchestrator, job_id, &task_id).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse::Queued {
            job_id: queued.id,
            status: queued.status,
        }),
    ))
}

/// Poll a job's status.
pub async fn status(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobStatusResponse>> {
    let job = job::get_job(state.db.pool(), job_id).await?;

    let error = if job.error_message.is_empty() {
        None
    } else {
        Some(job.error_message)
    };

    Ok(Json(JobStatusResponse {
        job_id: job.id,
        status: job.status,
        progress: job.progress,
        post_id: job.post_id,
        error,
    }))
}
