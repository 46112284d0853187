//! Analytics aggregation over completed posts.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Metric used to rank top posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Sentiment,
    Likes,
    Dislikes,
    Reactions,
}

impl SortKey {
    /// Parse a sort key, falling back to sentiment for unknown values.
    pub fn parse(value: &str) -> Self {
        match value {
            "likes" => SortKey::Likes,
            "dislikes" => SortKey::Dislikes,
            "reactions" => SortKey::Reactions,
            _ => SortKey::Sentiment,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SortKey::Sentiment => "p.sentiment_score",
            SortKey::Likes => "likes",
            SortKey::Dislikes => "dislikes",
            SortKey::Reactions => "total_reactions",
        }
    }
}

/// Query parameters for the analytics summary.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    pub sort: Option<String>,
    /// "asc" for ascending; anything else sorts descending.
    pub order: Option<String>,
    pub limit: Option<i64>,
    /// Inclusive lower bound on created_at (ISO 8601 date or datetime).
    pub from: Option<String>,
    /// Inclusive upper bound on created_at.
    pub to: Option<String>,
}

/// One ranked post in the summary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub sentiment_score: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub total_reactions: i64,
    pub persona: Option<String>,
    pub created_at: String,
}

/// Aggregated engagement analytics.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_posts: i64,
    pub total_engagements: i64,
    pub total_likes: i64,
    pub total_dislikes: i64,
    /// Engagements per completed post, rounded to two decimals.
    pub reaction_rate: f64,
    /// Mean sentiment score, rounded to two decimals.
    pub avg_sentiment_score: f64,
    pub top_posts: Vec<TopPost>,
}

#[derive(FromRow)]
struct Totals {
    total_posts: i64,
    total_likes: i64,
    total_dislikes: i64,
    sentiment_sum: i64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn date_filter(from: &Option<String>, to: &Option<String>) -> String {
    let mut clause = String::new();
    if from.is_some() {
        clause.push_str(" AND p.created_at >= ?");
    }
    if to.is_some() {
        clause.push_str(" AND p.created_at <= ?");
    }
    clause
}

/// Compute the analytics summary over completed posts in the given window.
pub async fn summary(pool: &SqlitePool, query: &AnalyticsQuery) -> Result<AnalyticsSummary> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let sort = SortKey::parse(query.sort.as_deref().unwrap_or("sentiment"));
    let ascending = query.order.as_deref() == Some("asc");
    let filter = date_filter(&query.from, &query.to);

    let totals_sql = format!(
        r#"
        SELECT
            COUNT(DISTINCT p.id) AS total_posts,
            COALESCE(SUM(CASE WHEN e.action = 'like' THEN 1 ELSE 0 END), 0) AS total_likes,
            COALESCE(SUM(CASE WHEN e.action = 'dislike' THEN 1 ELSE 0 END), 0) AS total_dislikes,
            COALESCE((
                SELECT SUM(p2.sentiment_score) FROM posts p2
                WHERE p2.status = 'completed'{filter2}
            ), 0) AS sentiment_sum
        FROM posts p
        LEFT JOIN engagements e ON e.post_id = p.id
        WHERE p.status = 'completed'{filter}
        "#,
        filter = filter,
        filter2 = filter.replace("p.created_at", "p2.created_at"),
    );

    let mut totals_query = sqlx::query_as::<_, Totals>(&totals_sql);
    // Bind order must match placeholder order: inner sum first, then outer.
    for bounds in [(&query.from, &query.to), (&query.from, &query.to)] {
        if let Some(from) = bounds.0 {
            totals_query = totals_query.bind(from);
        }
        if let Some(to) = bounds.1 {
            totals_query = totals_query.bind(to);
        }
    }
    let totals = totals_query.fetch_one(pool).await?;

    let direction = if ascending { "ASC" } else { "DESC" };
    let top_sql = format!(
        r#"
        SELECT
            p.id,
            p.title,
            p.slug,
            p.sentiment_score,
            COALESCE(SUM(CASE WHEN e.action = 'like' THEN 1 ELSE 0 END), 0) AS likes,
            COALESCE(SUM(CASE WHEN e.action = 'dislike' THEN 1 ELSE 0 END), 0) AS dislikes,
            COUNT(e.id) AS total_reactions,
            pr.name AS persona,
            p.created_at
        FROM posts p
        LEFT JOIN engagements e ON e.post_id = p.id
        LEFT JOIN personas pr ON pr.id = p.persona_id
        WHERE p.status = 'completed'{filter}
        GROUP BY p.id
        ORDER BY {column} {direction}, p.created_at DESC
        LIMIT ?
        "#,
        filter = filter,
        column = sort.column(),
        direction = direction,
    );

    let mut top_query = sqlx::query_as::<_, TopPost>(&top_sql);
    if let Some(from) = &query.from {
        top_query = top_query.bind(from);
    }
    if let Some(to) = &query.to {
        top_query = top_query.bind(to);
    }
    let top_posts = top_query.bind(limit).fetch_all(pool).await?;

    let total_engagements = totals.total_likes + totals.total_dislikes;
    let (reaction_rate, avg_sentiment_score) = if totals.total_posts > 0 {
        (
            round2(total_engagements as f64 / totals.total_posts as f64),
            round2(totals.sentiment_sum as f64 / totals.total_posts as f64),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(AnalyticsSummary {
        total_posts: totals.total_posts,
        total_engagements,
        total_likes: totals.total_likes,
        total_dislikes: totals.total_dislikes,
        reaction_rate,
        avg_sentiment_score,
        top_posts,
    })
}
