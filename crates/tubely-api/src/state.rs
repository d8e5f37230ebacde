//! Application state shared by every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::UploadPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub pipeline: UploadPipeline,
    /// Pinged by `/health`; absent when the repository is not Postgres-backed.
    pub db_pool: Option<PgPool>,
}
