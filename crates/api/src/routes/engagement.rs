//! Engagement endpoints: record reactions and read metrics.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{engagement, EngagementAction};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecordRequest {
    pub post_id: i64,
    pub session_id: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub post_id: i64,
    pub action: Option<EngagementAction>,
    pub was_toggle: bool,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub sentiment_score: i64,
}

#[derive(Deserialize)]
pub struct MetricsQuery {
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub post_id: i64,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub sentiment_score: i64,
    /// The querying session's current reaction, when a session is given.
    pub user_action: Option<EngagementAction>,
}

/// Record, toggle, or switch a reaction for a (post, session) pair.
pub async fn record(
    State(state): State<AppState>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<RecordResponse>> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("session_id is required".to_string()));
    }

    let action = EngagementAction::parse(&request.action).ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "invalid action '{}' (expected like or dislike)",
            request.action
        ))
    })?;

    let outcome = engagement::record_action(
        state.db.pool(),
        request.post_id,
        &request.session_id,
        action,
    )
    .await?;

    Ok(Json(RecordResponse {
        post_id: request.post_id,
        action: outcome.action,
        was_toggle: outcome.was_toggle,
        likes_count: outcome.likes_count,
        dislikes_count: outcome.dislikes_count,
        sentiment_score: outcome.new_score,
    }))
}

/// Read engagement metrics for a post.
pub async fn metrics(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>> {
    let metrics = engagement::get_metrics(state.db.pool(), post_id).await?;

    let user_action = match query.session_id.as_deref() {
        Some(session_id) if !session_id.is_empty() => {
            engagement::get_user_action(state.db.pool(), post_id, session_id).await?
        }
        _ => None,
    };

    Ok(Json(MetricsResponse {
        post_id: metrics.post_id,
        likes_count: metrics.likes_count,
        dislikes_count: metrics.dislikes_count,
        sentiment_score: metrics.sentiment_score,
        user_action,
    }))
}
