//! Post listing, retrieval, and deletion endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{persona, post, Post, PostStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    /// Persona slug filter.
    pub persona: Option<String>,
    pub limit: Option<i64>,
}

/// A post with its JSON columns decoded.
#[derive(Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub topic_input: String,
    pub generated_content: String,
    pub content_structure: Value,
    pub sources: Value,
    pub persona_id: Option<i64>,
    pub status: PostStatus,
    pub sentiment_score: i64,
    pub metadata: Value,
    pub published_at: Option<String>,
    pub created_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            topic_input: post.topic_input,
            generated_content: post.generated_content,
            content_structure: decode(&post.content_structure, Value::Object(Default::default())),
            sources: decode(&post.sources, Value::Array(Vec::new())),
            persona_id: post.persona_id,
            status: post.status,
            sentiment_score: post.sentiment_score,
            metadata: decode(&post.metadata, Value::Object(Default::default())),
            published_at: post.published_at,
            created_at: post.created_at,
        }
    }
}

fn decode(raw: &str, fallback: Value) -> Value {
    serde_json::from_str(raw).unwrap_or(fallback)
}

/// List posts, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PostResponse>>> {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(PostStatus::parse(raw).ok_or_else(|| {
            ApiError::InvalidInput(format!("unknown post status '{raw}'"))
        })?),
    };

    let persona_id = match query.persona.as_deref() {
        None => None,
        Some(slug) => Some(persona::get_active_by_slug(state.db.pool(), slug).await?.id),
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let posts = post::list_posts(state.db.pool(), status, persona_id, limit).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Fetch one post by ID.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>> {
    let post = post::get_post(state.db.pool(), id).await?;
    Ok(Json(post.into()))
}

/// Delete a post. Citations and engagements cascade.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    post::delete_post(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
