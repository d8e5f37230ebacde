//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{PgVideoRepository, VideoRepository};
use tubely_processing::{FfmpegTools, MediaTools, PipelineSettings, UploadPipeline};

/// Connect to the database and storage backends, then build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let videos: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(pool.clone()));
    let tools: Arc<dyn MediaTools> = Arc::new(FfmpegTools::new(
        config.ffprobe_path.clone(),
        config.ffmpeg_path.clone(),
        config.media_tool_timeout(),
    ));

    let pipeline = UploadPipeline::new(
        videos.clone(),
        storage.videos,
        storage.assets,
        tools,
        pipeline_settings(&config),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        videos,
        pipeline,
        db_pool: Some(pool),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

pub fn pipeline_settings(config: &Config) -> PipelineSettings {
    PipelineSettings {
        temp_dir: config.upload_temp_dir.clone(),
        mode: config.video_processing,
        max_thumbnail_bytes: config.max_thumbnail_upload_bytes,
    }
}
