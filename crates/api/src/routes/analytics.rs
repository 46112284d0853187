//! Analytics summary endpoint.

use axum::extract::{Query, State};
use axum::Json;
use database::analytics::{self, AnalyticsQuery, AnalyticsSummary};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Aggregated engagement analytics over completed posts.
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AnalyticsSummary>> {
    let summary = analytics::summary(
        state.db.pool(),
        &AnalyticsQuery {
            sort: query.sort,
            order: query.order,
            limit: query.limit,
            from: query.from,
            to: query.to,
        },
    )
    .await?;

    Ok(Json(summary))
}
