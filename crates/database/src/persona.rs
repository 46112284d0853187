//! Persona queries.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DatabaseError, Result};
use crate::models::Persona;

/// Seed data for a default persona.
struct PersonaSeed {
    name: &'static str,
    slug: &'static str,
    category: &'static str,
    description: &'static str,
    temperature: f64,
    display_order: i64,
}

const DEFAULT_PERSONAS: &[PersonaSeed] = &[
    PersonaSeed {
        name: "Technical Writer",
        slug: "technical",
        category: "technical",
        description: "Precise, jargon-appropriate, citation-heavy writing",
        temperature: 0.7,
        display_order: 1,
    },
    PersonaSeed {
        name: "Storyteller",
        slug: "narrative",
        category: "narrative",
        description: "Narrative-driven, emotional hooks, memorable content",
        temperature: 0.8,
        display_order: 2,
    },
    PersonaSeed {
        name: "Industry Analyst",
        slug: "analyst",
        category: "analyst",
        description: "Data-focused, trend-aware, forward-looking insights",
        temperature: 0.6,
        display_order: 3,
    },
    PersonaSeed {
        name: "Educator",
        slug: "educator",
        category: "educator",
        description: "Explanatory, structured, beginner-friendly approach",
        temperature: 0.7,
        display_order: 4,
    },
];

/// List active personas ordered for display.
pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Persona>> {
    let personas = sqlx::query_as::<_, Persona>(
        "SELECT * FROM personas WHERE is_active = 1 ORDER BY display_order, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(personas)
}

/// Fetch an active persona by slug.
pub async fn get_active_by_slug(pool: &SqlitePool, slug: &str) -> Result<Persona> {
    sqlx::query_as::<_, Persona>("SELECT * FROM personas WHERE slug = ? AND is_active = 1")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "persona",
            id: slug.to_string(),
        })
}

/// Insert the default personas if they are missing. Existing rows are left
/// untouched so operator edits survive restarts.
pub async fn ensure_default_personas(pool: &SqlitePool) -> Result<u64> {
    let mut created = 0;

    for seed in DEFAULT_PERSONAS {
        let result = sqlx::query(
            r#"
            INSERT INTO personas (name, slug, category, description, temperature, display_order)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(slug) DO NOTHING
            "#,
        )
        .bind(seed.name)
        .bind(seed.slug)
        .bind(seed.category)
        .bind(seed.description)
        .bind(seed.temperature)
        .bind(seed.display_order)
        .execute(pool)
        .await?;

        created += result.rows_affected();
    }

    if created > 0 {
        info!(created, "seeded default personas");
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = test_db().await;

        assert_eq!(ensure_default_personas(db.pool()).await.unwrap(), 4);
        assert_eq!(ensure_default_personas(db.pool()).await.unwrap(), 0);

        let personas = list_active(db.pool()).await.unwrap();
        assert_eq!(personas.len(), 4);
        assert_eq!(personas[0].slug, "technical");
        assert_eq!(personas[3].slug, "educator");
    }

    #[tokio::test]
    async fn test_seed_preserves_edits() {
        let db = test_db().await;
        ensure_default_personas(db.pool()).await.unwrap();

        sqlx::query("UPDATE personas SET temperature = 0.95 WHERE slug = 'narrative'")
            .execute(db.pool())
            .await
            .unwrap();

        ensure_default_personas(db.pool()).await.unwrap();

        let persona = get_active_by_slug(db.pool(), "narrative").await.unwrap();
        assert_eq!(persona.temperature, 0.95);
    }

    #[tokio::test]
    async fn test_inactive_personas_hidden() {
        let db = test_db().await;
        ensure_default_personas(db.pool()).await.unwrap();

        sqlx::query("UPDATE personas SET is_active = 0 WHERE slug = 'analyst'")
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(list_active(db.pool()).await.unwrap().len(), 3);
        assert!(matches!(
            get_active_by_slug(db.pool(), "analyst").await,
            Err(DatabaseError::NotFound { entity: "persona", .. })
        ));
    }
}
