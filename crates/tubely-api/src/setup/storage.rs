//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_assets_storage, create_storage, Storage};

/// Blob storage for processed videos and the local assets directory for thumbnails.
pub struct StorageSetup {
    pub videos: Arc<dyn Storage>,
    pub assets: Arc<dyn Storage>,
}

pub async fn setup_storage(config: &Config) -> Result<StorageSetup> {
    tracing::info!("Initializing storage...");

    let videos = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    let assets = create_assets_storage(config)
        .await
        .context("Failed to initialize assets directory")?;

    tracing::info!(
        backend = %videos.backend_type(),
        assets_root = %config.assets_root.display(),
        "Storage initialized successfully"
    );

    Ok(StorageSetup { videos, assets })
}
