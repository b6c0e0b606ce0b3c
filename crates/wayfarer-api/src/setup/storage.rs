//! Media store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use wayfarer_core::Config;
use wayfarer_storage::{LocalMediaStore, MediaStore};

/// Create the media root and the transient upload directory.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn MediaStore>> {
    let store = LocalMediaStore::new(config.media_root.clone())
        .await
        .with_context(|| format!("Failed to open media root {}", config.media_root.display()))?;

    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir.display()
            )
        })?;

    tracing::info!(
        media_root = %config.media_root.display(),
        upload_temp_dir = %config.upload_temp_dir.display(),
        "Media storage ready"
    );
    Ok(Arc::new(store))
}
