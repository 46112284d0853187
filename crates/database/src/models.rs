//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Post lifecycle status. Transitions move only forward:
/// draft -> generating -> completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Generating,
    Completed,
    Failed,
}

impl PostStatus {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Generating => "generating",
            PostStatus::Completed => "completed",
            PostStatus::Failed => "failed",
        }
    }

    /// Parse a status string, if valid.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PostStatus::Draft),
            "generating" => Some(PostStatus::Generating),
            "completed" => Some(PostStatus::Completed),
            "failed" => Some(PostStatus::Failed),
            _ => None,
        }
    }
}

/// Job lifecycle status. Monotonic: queued -> running -> completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// An engagement reaction. Exactly one per (post, session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EngagementAction {
    Like,
    Dislike,
}

impl EngagementAction {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementAction::Like => "like",
            EngagementAction::Dislike => "dislike",
        }
    }

    /// Parse an action string, if valid.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(EngagementAction::Like),
            "dislike" => Some(EngagementAction::Dislike),
            _ => None,
        }
    }
}

/// A writing persona steering generation style and sampling parameters.
///
/// Read-only input to the generation pipeline; edited by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Persona {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name, unique.
    pub name: String,
    /// URL-safe identifier, unique.
    pub slug: String,
    /// Style category (technical, narrative, analyst, educator, creative).
    pub category: String,
    /// Free-text custom instructions appended to the base system prompt.
    pub system_prompt: String,
    /// User-facing description.
    pub description: String,
    /// Sampling temperature, 0.0-1.0.
    pub temperature: f64,
    /// Max output tokens.
    pub max_tokens: i64,
    /// Nucleus sampling top-p.
    pub top_p: f64,
    /// Whether the persona is selectable for generation.
    pub is_active: bool,
    /// Listing order.
    pub display_order: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// One generation attempt and its artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Generated or placeholder title.
    pub title: String,
    /// Unique slug derived from the topic.
    pub slug: String,
    /// Original user topic input.
    pub topic_input: String,
    /// Full rendered prompt sent to the provider, kept for auditability.
    pub raw_prompt: String,
    /// Generated body in markdown.
    pub generated_content: String,
    /// Parsed structure (word count, headings, reading time) as JSON.
    pub content_structure: String,
    /// Extracted source citations as JSON.
    pub sources: String,
    /// Persona used, if still present.
    pub persona_id: Option<i64>,
    /// Lifecycle status.
    pub status: PostStatus,
    /// Derived score: likes - dislikes.
    pub sentiment_score: i64,
    /// Generation metadata (token usage, timing, error text) as JSON.
    pub metadata: String,
    /// Publish timestamp, set on completion.
    pub published_at: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl Post {
    /// Word count of the generated content.
    pub fn word_count(&self) -> usize {
        self.generated_content.split_whitespace().count()
    }

    /// Estimated reading time at 200 words per minute, at least 1 minute.
    pub fn reading_time(&self) -> usize {
        std::cmp::max(1, self.word_count() / 200)
    }
}

/// An asynchronous generation request, independent of the post it may produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Requested topic.
    pub topic: String,
    /// Persona referenced by slug; the job may outlive persona edits.
    pub persona_slug: String,
    /// Submitting session, if reported.
    pub session_id: String,
    /// Requested speed mode.
    pub speed: String,
    /// Additional context as JSON.
    pub additional_context: String,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Progress 0-100, monotonic non-decreasing.
    pub progress: i64,
    /// Resulting post, once completed.
    pub post_id: Option<i64>,
    /// Error text, for failed jobs.
    pub error_message: String,
    /// External task identifier.
    pub task_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// One extracted source citation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SourceCitation {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Post this citation belongs to.
    pub post_id: i64,
    /// Citation label.
    pub title: String,
    /// Cited URL.
    pub url: String,
    /// URL host with a leading "www." stripped.
    pub domain: String,
    /// Whether the source has been verified.
    pub is_verified: bool,
    /// Optional relevance score.
    pub relevance_score: Option<f64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// One (post, session) reaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Engagement {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Post reacted to.
    pub post_id: i64,
    /// Anonymous session identifier.
    pub session_id: String,
    /// Current reaction.
    pub action: EngagementAction,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}
