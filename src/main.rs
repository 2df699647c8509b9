//! Listing Proxy - cached, filterable listing of a Webflow collection
//!
//! Serves `GET /api/bookkeepers` backed by an in-memory snapshot of the
//! collection that is refreshed once its TTL has passed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listing_proxy::cache::CacheManager;
use listing_proxy::cli::Cli;
use listing_proxy::config::Config;
use listing_proxy::server::{build_app, AppState};

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.apply_overrides(Config::from_env().context("Failed to load configuration")?);
    tracing::info!(
        collection = %config.webflow.collection_id,
        ttl_secs = config.cache_ttl_secs,
        "Configuration loaded"
    );

    let state = AppState::new(&config, Arc::new(CacheManager::new()));

    if cli.warm {
        tracing::info!("Warming snapshot cache...");
        if let Err(e) = state.refresh().await {
            tracing::warn!("Cache warm-up failed, will retry on first request: {}", e);
        }
    }

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
