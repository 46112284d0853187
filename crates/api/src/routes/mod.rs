//! Route handlers for the blog generation API.

pub mod analytics;
pub mod engagement;
pub mod generate;
pub mod health;
pub mod personas;
pub mod posts;


use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/personas", get(personas::list))
        .route("/api/posts", get(posts::list))
        .route("/api/posts/:id", get(posts::get).delete(posts::delete))
        .route("/api/generate", post(generate::submit))
        .route("/api/generate/status/:job_id", get(generate::status))
        .route("/api/engagement", post(engagement::record))
        .route("/api/engagement/:post_id", get(engagement::metrics))
        .route("/api/analytics", get(analytics::summary))
}
