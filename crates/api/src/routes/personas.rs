//! Persona listing endpoint.

use axum::extract::State;
use axum::Json;
use database::persona;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PersonaSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
}

/// List active personas available for generation.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PersonaSummary>>> {
    let personas = persona::list_active(state.db.pool()).await?;

    Ok(Json(
        personas
            .into_iter()
            .map(|p| PersonaSummary {
                id: p.id,
                name: p.name,
                slug: p.slug,
                category: p.category,
                description: p.description,
            })
            .collect(),
    ))
}
