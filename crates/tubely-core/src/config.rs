//! Configuration module
//!
//! Configuration is read once at startup and then shared read-only (behind an
//! `Arc`) with every request. Nothing here is global; handlers receive the
//! values they need through application state.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::VideoProcessingMode;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;
const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30;
const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 10 << 20;
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    // Video storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Thumbnails
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    // Video processing
    pub upload_temp_dir: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub media_tool_timeout_secs: u64,
    pub video_processing: VideoProcessingMode,
    pub max_video_upload_bytes: usize,
    pub max_thumbnail_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::S3,
        };

        let video_processing = match var("VIDEO_PROCESSING") {
            Some(mode) => mode.parse()?,
            None => VideoProcessingMode::FastStart,
        };

        let assets_base_url = var("ASSETS_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}/assets", server_port));

        let config = Config {
            server_port,
            environment,
            cors_origins,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                var("DB_MAX_CONNECTIONS"),
                MAX_CONNECTIONS,
            )?,
            db_timeout_seconds: parse_or(
                "DB_TIMEOUT_SECONDS",
                var("DB_TIMEOUT_SECONDS"),
                CONNECTION_TIMEOUT_SECS,
            )?,
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?,
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            assets_root: var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            assets_base_url,
            upload_temp_dir: var("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            media_tool_timeout_secs: parse_or(
                "MEDIA_TOOL_TIMEOUT_SECS",
                var("MEDIA_TOOL_TIMEOUT_SECS"),
                MEDIA_TOOL_TIMEOUT_SECS,
            )?,
            video_processing,
            max_video_upload_bytes: parse_or(
                "MAX_VIDEO_UPLOAD_BYTES",
                var("MAX_VIDEO_UPLOAD_BYTES"),
                MAX_VIDEO_UPLOAD_BYTES,
            )?,
            max_thumbnail_upload_bytes: parse_or(
                "MAX_THUMBNAIL_UPLOAD_BYTES",
                var("MAX_THUMBNAIL_UPLOAD_BYTES"),
                MAX_THUMBNAIL_UPLOAD_BYTES,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn media_tool_timeout(&self) -> Duration {
        Duration::from_secs(self.media_tool_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.media_tool_timeout_secs == 0 {
            return Err(anyhow::anyhow!("MEDIA_TOOL_TIMEOUT_SECS must be greater than zero"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Parse a numeric variable, or use `default` when it is unset.
fn parse_or<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        None => Ok(default),
    }
}
