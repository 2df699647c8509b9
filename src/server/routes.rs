//! Route handlers for the listing endpoint and the health check

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AppState, ListingError, CACHE_KEY};
use crate::listing::{ListingPage, ListingParams, ListingQuery};

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    snapshot: Option<SnapshotHealth>,
}

/// State of the cached snapshot, absent before the first refresh
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHealth {
    items: usize,
    fetched_at: DateTime<Utc>,
    fresh: bool,
}

/// `GET /api/bookkeepers?city=&industry=&page=&limit=`
///
/// Resolves the shared snapshot, then filters and paginates it for this
/// request.
pub async fn list_bookkeepers(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingPage>, ListingError> {
    let Query(params) = params.map_err(|rejection| ListingError::InvalidQuery(rejection.body_text()))?;
    let query =
        ListingQuery::from_params(params).map_err(|e| ListingError::InvalidQuery(e.to_string()))?;

    let snapshot = state.resolve_snapshot().await?;

    Ok(Json(query.apply(&snapshot.items)))
}

/// Liveness check, reporting the cached snapshot without touching upstream
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.cache.get(CACHE_KEY).map(|snapshot| SnapshotHealth {
        items: snapshot.items.len(),
        fetched_at: snapshot.fetched_at,
        fresh: snapshot.is_fresh(state.cache_ttl, Utc::now()),
    });

    Json(HealthResponse {
        status: "ok",
        snapshot,
    })
}
