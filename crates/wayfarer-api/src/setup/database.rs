//! Document store selection

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wayfarer_core::{Config, DocumentStoreKind};
use wayfarer_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const POOL_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

pub async fn setup_document_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.document_store {
        DocumentStoreKind::Memory => {
            tracing::warn!("DOCUMENT_STORE=memory: records live only as long as the process");
            Arc::new(MemoryDocumentStore::new())
        }
        DocumentStoreKind::Postgres => Arc::new(PgDocumentStore::new(connect(config).await?)),
    };
    Ok(store)
}

/// Open the pool and bring the document tables up to date.
async fn connect(config: &Config) -> Result<PgPool> {
    let started = Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(POOL_IDLE_TIMEOUT)
        .max_lifetime(POOL_MAX_LIFETIME)
        .connect(&config.database_url)
        .await
        .context("Cannot reach the document database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Document table migrations failed")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        duration_ms = started.elapsed().as_millis() as u64,
        "Document database ready"
    );
    Ok(pool)
}
