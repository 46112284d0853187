//! Post queries.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DatabaseError, Result};
use crate::models::{Post, PostStatus};

/// Fields written when a generation run completes.
pub struct CompletedPost {
    pub title: String,
    pub generated_content: String,
    /// Parsed structure as JSON.
    pub content_structure: Value,
    /// Extracted citations as a JSON array.
    pub sources: Value,
    /// Generation metadata (model, token usage, timing).
    pub metadata: Value,
}

/// One citation to persist alongside a completed post.
pub struct NewCitation {
    pub title: String,
    pub url: String,
    pub domain: String,
}

/// Turn free text into a URL-safe slug: lowercase alphanumeric runs
/// joined by hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug.truncate(60);
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Placeholder title used while generation is in flight.
fn draft_title(topic: &str) -> String {
    let truncated: String = topic.chars().take(50).collect();
    if topic.chars().count() > 50 {
        format!("Draft: {truncated}...")
    } else {
        format!("Draft: {truncated}")
    }
}

/// Create a post in `generating` status with a unique slug.
///
/// Slug collisions get a numeric suffix (`topic`, `topic-2`, `topic-3`, ...).
pub async fn create_generating(
    pool: &SqlitePool,
    topic: &str,
    raw_prompt: &str,
    persona_id: i64,
) -> Result<Post> {
    let base_slug = slugify(topic);
    let title = draft_title(topic);

    let mut counter = 1;
    loop {
        let slug = if counter == 1 {
            base_slug.clone()
        } else {
            format!("{base_slug}-{counter}")
        };

        let result = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, slug, topic_input, raw_prompt, persona_id, status)
            VALUES (?, ?, ?, ?, ?, 'generating')
            RETURNING *
            "#,
        )
        .bind(&title)
        .bind(&slug)
        .bind(topic)
        .bind(raw_prompt)
        .bind(persona_id)
        .fetch_one(pool)
        .await;

        match result {
            Ok(post) => {
                debug!(post_id = post.id, slug = %post.slug, "created generating post");
                return Ok(post);
            }
            Err(err) if is_unique_violation(&err) && counter < 100 => {
                counter += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Fetch a post by ID.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Post> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "post",
            id: id.to_string(),
        })
}

/// List posts, newest first, optionally filtered by status and persona.
pub async fn list_posts(
    pool: &SqlitePool,
    status: Option<PostStatus>,
    persona_id: Option<i64>,
    limit: i64,
) -> Result<Vec<Post>> {
    let mut sql = String::from("SELECT * FROM posts WHERE 1 = 1");
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if persona_id.is_some() {
        sql.push_str(" AND persona_id = ?");
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");

    let mut query = sqlx::query_as::<_, Post>(&sql);
    if let Some(status) = status {
        query = query.bind(status.as_str());
    }
    if let Some(persona_id) = persona_id {
        query = query.bind(persona_id);
    }

    Ok(query.bind(limit).fetch_all(pool).await?)
}

/// Delete a post. Citations and engagements cascade.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "post",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Mark a post completed with its generated content and citations.
pub async fn complete_post(
    pool: &SqlitePool,
    id: i64,
    completed: &CompletedPost,
    citations: &[NewCitation],
) -> Result<Post> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = ?,
            generated_content = ?,
            content_structure = ?,
            sources = ?,
            metadata = ?,
            status = 'completed',
            published_at = datetime('now'),
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&completed.title)
    .bind(&completed.generated_content)
    .bind(completed.content_structure.to_string())
    .bind(completed.sources.to_string())
    .bind(completed.metadata.to_string())
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "post",
        id: id.to_string(),
    })?;

    for citation in citations {
        sqlx::query(
            r#"
            INSERT INTO source_citations (post_id, title, url, domain)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(post_id, url) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&citation.title)
        .bind(&citation.url)
        .bind(&citation.domain)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(post)
}

/// Mark a post failed, recording the error in its metadata.
pub async fn fail_post(pool: &SqlitePool, id: i64, error: &str) -> Result<()> {
    let post = get_post(pool, id).await?;

    let mut metadata: Value =
        serde_json::from_str(&post.metadata).unwrap_or_else(|_| Value::Object(Default::default()));
    if let Some(object) = metadata.as_object_mut() {
        object.insert("error".to_string(), Value::String(error.to_string()));
    }

    let result = sqlx::query(
        r#"
        UPDATE posts
        SET status = 'failed', metadata = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(metadata.to_string())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        warn!(post_id = id, "failed post vanished before update");
    }

    Ok(())
}

/// List the citation rows for a post.
pub async fn list_citations(pool: &SqlitePool, post_id: i64) -> Result<Vec<crate::SourceCitation>> {
    Ok(sqlx::query_as::<_, crate::SourceCitation>(
        "SELECT * FROM source_citations WHERE post_id = ? ORDER BY id",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}
