//! Application setup and initialization
//!
//! Startup order: configuration check, telemetry, document store, media store, state, routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, UploadLimits};
use anyhow::{Context, Result};
use std::sync::Arc;
use wayfarer_core::Config;
use wayfarer_db::DocumentStore;
use wayfarer_services::Services;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format, &config.environment)?;
    tracing::info!("Configuration loaded and validated successfully");

    let store = database::setup_document_store(&config).await?;
    build_app(config, store).await
}

/// Wire state and routes around an existing document store.
pub async fn build_app(
    config: Config,
    store: Arc<dyn DocumentStore>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let media_store = storage::setup_storage(&config).await?;
    let services = Services::new(
        store.clone(),
        media_store,
        config.trending_states.clone(),
    );

    let state = Arc::new(AppState {
        services,
        store,
        media_root: config.media_root.clone(),
        uploads: UploadLimits::from_config(&config),
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
