//! Engagement queries: like/dislike reactions and sentiment recompute.

use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::EngagementAction;

/// Result of applying an engagement action.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementOutcome {
    /// The session's reaction after this request, if any.
    pub action: Option<EngagementAction>,
    /// Whether the request removed an existing identical reaction.
    pub was_toggle: bool,
    pub likes_count: i64,
    pub dislikes_count: i64,
    /// Recomputed score: likes - dislikes.
    pub new_score: i64,
}

/// Per-post engagement counts.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementMetrics {
    pub post_id: i64,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub sentiment_score: i64,
}

/// Apply a reaction for a (post, session) pair.
///
/// Repeating the current reaction removes it; a different reaction replaces
/// it; otherwise a new row is inserted. The post's sentiment score is
/// recomputed from the surviving rows in the same transaction, so the stored
/// score always equals likes minus dislikes.
pub async fn record_action(
    pool: &SqlitePool,
    post_id: i64,
    session_id: &str,
    action: EngagementAction,
) -> Result<EngagementOutcome> {
    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(DatabaseError::NotFound {
            entity: "post",
            id: post_id.to_string(),
        });
    }

    let existing: Option<(EngagementAction,)> =
        sqlx::query_as("SELECT action FROM engagements WHERE post_id = ? AND session_id = ?")
            .bind(post_id)
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await?;

    let (final_action, was_toggle) = match existing {
        Some((current,)) if current == action => {
            sqlx::query("DELETE FROM engagements WHERE post_id = ? AND session_id = ?")
                .bind(post_id)
                .bind(session_id)
                .execute(&mut *tx)
                .await?;
            (None, true)
        }
        Some(_) => {
            sqlx::query(
                r#"
                UPDATE engagements
                SET action = ?, updated_at = datetime('now')
                WHERE post_id = ? AND session_id = ?
                "#,
            )
            .bind(action.as_str())
            .bind(post_id)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
            (Some(action), false)
        }
        None => {
            sqlx::query("INSERT INTO engagements (post_id, session_id, action) VALUES (?, ?, ?)")
                .bind(post_id)
                .bind(session_id)
                .bind(action.as_str())
                .execute(&mut *tx)
                .await?;
            (Some(action), false)
        }
    };

    let (likes, dislikes, score) = recompute_in_tx(&mut tx, post_id).await?;
    tx.commit().await?;

    debug!(post_id, session_id, score, "recorded engagement");

    Ok(EngagementOutcome {
        action: final_action,
        was_toggle,
        likes_count: likes,
        dislikes_count: dislikes,
        new_score: score,
    })
}

/// Recompute and store a post's sentiment score from its engagement rows.
pub async fn recompute_sentiment(pool: &SqlitePool, post_id: i64) -> Result<i64> {
    let mut tx = pool.begin().await?;
    let (_, _, score) = recompute_in_tx(&mut tx, post_id).await?;
    tx.commit().await?;
    Ok(score)
}

async fn recompute_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    post_id: i64,
) -> Result<(i64, i64, i64)> {
    let (likes, dislikes): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN action = 'like' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN action = 'dislike' THEN 1 ELSE 0 END), 0)
        FROM engagements
        WHERE post_id = ?
        "#,
    )
    .bind(post_id)
    .fetch_one(&mut **tx)
    .await?;

    let score = likes - dislikes;

    sqlx::query("UPDATE posts SET sentiment_score = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(score)
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    Ok((likes, dislikes, score))
}

/// Current counts and score for a post.
pub async fn get_metrics(pool: &SqlitePool, post_id: i64) -> Result<EngagementMetrics> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT sentiment_score FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    let sentiment_score = exists
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "post",
            id: post_id.to_string(),
        })?
        .0;

    let (likes_count, dislikes_count): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN action = 'like' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN action = 'dislike' THEN 1 ELSE 0 END), 0)
        FROM engagements
        WHERE post_id = ?
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(EngagementMetrics {
        post_id,
        likes_count,
        dislikes_count,
        sentiment_score,
    })
}

/// The session's current reaction for a post, if any.
pub async fn get_user_action(
    pool: &SqlitePool,
    post_id: i64,
    session_id: &str,
) -> Result<Option<EngagementAction>> {
    let row: Option<(EngagementAction,)> =
        sqlx::query_as("SELECT action FROM engagements WHERE post_id = ? AND session_id = ?")
            .bind(post_id)
            .bind(session_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(action,)| action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::ensure_default_personas;
    use crate::post::create_generating;
    use crate::test_db;

    async fn seeded_post(pool: &SqlitePool) -> i64 {
        ensure_default_personas(pool).await.unwrap();
        let persona = crate::persona::get_active_by_slug(pool, "technical")
            .await
            .unwrap();
        create_generating(pool, "engagement target", "p", persona.id)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_like_then_toggle_off() {
        let db = test_db().await;
        let post_id = seeded_post(db.pool()).await;

        let first = record_action(db.pool(), post_id, "sess-1", EngagementAction::Like)
            .await
            .unwrap();
        assert_eq!(first.action, Some(EngagementAction::Like));
        assert!(!first.was_toggle);
        assert_eq!(first.new_score, 1);

        let second = record_action(db.pool(), post_id, "sess-1", EngagementAction::Like)
            .await
            .unwrap();
        assert_eq!(second.action, None);
        assert!(second.was_toggle);
        assert_eq!(second.new_score, 0);
        assert_eq!(second.likes_count, 0);
    }

    #[tokio::test]
    async fn test_switch_reaction() {
        let db = test_db().await;
        let post_id = seeded_post(db.pool()).await;

        record_action(db.pool(), post_id, "sess-1", EngagementAction::Like)
            .await
            .unwrap();
        let switched = record_action(db.pool(), post_id, "sess-1", EngagementAction::Dislike)
            .await
            .unwrap();

        assert_eq!(switched.action, Some(EngagementAction::Dislike));
        assert!(!switched.was_toggle);
        assert_eq!(switched.new_score, -1);
        assert_eq!(switched.likes_count, 0);
        assert_eq!(switched.dislikes_count, 1);
    }

    #[tokio::test]
    async fn test_score_tracks_multiple_sessions() {
        let db = test_db().await;
        let post_id = seeded_post(db.pool()).await;

        for session in ["a", "b", "c"] {
            record_action(db.pool(), post_id, session, EngagementAction::Like)
                .await
                .unwrap();
        }
        record_action(db.pool(), post_id, "d", EngagementAction::Dislike)
            .await
            .unwrap();

        let metrics = get_metrics(db.pool(), post_id).await.unwrap();
        assert_eq!(metrics.likes_count, 3);
        assert_eq!(metrics.dislikes_count, 1);
        assert_eq!(metrics.sentiment_score, 2);

        let post = crate::post::get_post(db.pool(), post_id).await.unwrap();
        assert_eq!(post.sentiment_score, 2);
    }

    #[tokio::test]
    async fn test_unknown_post_rejected() {
        let db = test_db().await;
        assert!(matches!(
            record_action(db.pool(), 999, "sess", EngagementAction::Like).await,
            Err(DatabaseError::NotFound { entity: "post", .. })
        ));
    }

    #[tokio::test]
    async fn test_get_user_action() {
        let db = test_db().await;
        let post_id = seeded_post(db.pool()).await;

        assert_eq!(
            get_user_action(db.pool(), post_id, "sess-1").await.unwrap(),
            None
        );
        record_action(db.pool(), post_id, "sess-1", EngagementAction::Dislike)
            .await
            .unwrap();
        assert_eq!(
            get_user_action(db.pool(), post_id, "sess-1").await.unwrap(),
            Some(EngagementAction::Dislike)
        );
    }
}
