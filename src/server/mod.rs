//! HTTP server: shared state, snapshot resolution and the router
//!
//! All requests share one snapshot stored under [`CACHE_KEY`]. Concurrent
//! requests that find it stale each refresh independently and the last
//! write wins.

mod error;
pub mod routes;

pub use error::{handle_panic, ListingError};

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::{Duration, Utc};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::data::{CachedSnapshot, WebflowClient, WebflowError};

/// The single cache key shared by every request, whatever its filters
pub const CACHE_KEY: &str = "bookkeepers_all";

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn SnapshotCache>,
    pub client: WebflowClient,
    pub cache_ttl: Duration,
}

impl AppState {
    /// Builds state for `config` on top of the given cache
    pub fn new(config: &Config, cache: Arc<dyn SnapshotCache>) -> Self {
        Self {
            cache,
            client: WebflowClient::new(config.webflow.clone()),
            cache_ttl: config.cache_ttl(),
        }
    }

    /// Returns the cached snapshot if still fresh, otherwise refreshes it
    pub async fn resolve_snapshot(&self) -> Result<CachedSnapshot, WebflowError> {
        if let Some(snapshot) = self.cache.get(CACHE_KEY) {
            if snapshot.is_fresh(self.cache_ttl, Utc::now()) {
                tracing::debug!(items = snapshot.items.len(), "Serving cached snapshot");
                return Ok(snapshot);
            }
        }

        self.refresh().await
    }

    /// Fetches the whole collection and replaces the cached snapshot
    ///
    /// On error the cache is left untouched.
    pub async fn refresh(&self) -> Result<CachedSnapshot, WebflowError> {
        let items = self.client.fetch_all_items().await?;
        let snapshot = CachedSnapshot::new(items);
        self.cache.set(CACHE_KEY, snapshot.clone());

        tracing::info!("Fetched {} items from Webflow", snapshot.items.len());
        Ok(snapshot)
    }
}

/// Builds the application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/bookkeepers", get(routes::list_bookkeepers))
        .route("/health", get(routes::health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
