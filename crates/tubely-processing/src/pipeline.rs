//! Video and thumbnail upload pipelines
//!
//! Video: check ownership and content type, stage the body to a temp file,
//! probe and classify it, remux for fast start, stream the result to blob
//! storage and record its URL. Thumbnails skip the processing steps and go
//! straight to the assets store.
//!
//! Every temp file created for a request is removed before the request
//! returns, on success and on every failure path.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::models::{Orientation, Video, VideoProcessingMode};
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_storage::{thumbnail_key, video_key, Storage};
use uuid::Uuid;

use crate::content_type::MediaType;
use crate::orientation::classify;
use crate::remux::remux_output_path;
use crate::tools::MediaTools;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";
const STAGING_PREFIX: &str = "tubely-upload";
const READ_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Directory staged uploads and remux output are written to.
    pub temp_dir: PathBuf,
    pub mode: VideoProcessingMode,
    /// Upper bound on a thumbnail body, which is buffered in memory.
    pub max_thumbnail_bytes: usize,
}

#[derive(Clone)]
pub struct UploadPipeline {
    videos: Arc<dyn VideoRepository>,
    video_storage: Arc<dyn Storage>,
    assets: Arc<dyn Storage>,
    tools: Arc<dyn MediaTools>,
    settings: PipelineSettings,
}

impl UploadPipeline {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        video_storage: Arc<dyn Storage>,
        assets: Arc<dyn Storage>,
        tools: Arc<dyn MediaTools>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            videos,
            video_storage,
            assets,
            tools,
            settings,
        }
    }

    /// Process an uploaded MP4 and point the video record at the stored copy.
    ///
    /// Read errors from `body` that wrap an [`AppError`] (see
    /// [`body_read_error`]) are surfaced as that error.
    #[tracing::instrument(skip(self, body))]
    pub async fn upload_video<R>(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        content_type: &str,
        mut body: R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let video = self.owned_video(video_id, user_id).await?;

        let media_type = MediaType::parse(content_type)?;
        if media_type.essence() != VIDEO_CONTENT_TYPE {
            return Err(AppError::UnsupportedMediaType(
                "Only MP4 videos are allowed for upload".to_string(),
            ));
        }

        let staged = self.stage(&mut body).await?;

        let (key, processed) = match self.settings.mode {
            VideoProcessingMode::FastStart => {
                let orientation = self.orientation_of(&staged).await?;
                let processed = self.remux(&staged).await?;
                (video_key(Some(orientation)), Some(processed))
            }
            VideoProcessingMode::Passthrough => (video_key(None), None),
        };
        let upload_path: &Path = processed.as_deref().unwrap_or(&*staged);

        let file = tokio::fs::File::open(upload_path).await?;
        let url = self
            .video_storage
            .put_stream(&key, &media_type.essence(), Box::pin(file))
            .await?;

        let updated = self
            .record_or_rollback(
                video.with_video_url(url),
                self.video_storage.as_ref(),
                &key,
            )
            .await?;

        tracing::info!(
            video_id = %video_id,
            key = %key,
            backend = %self.video_storage.backend_type(),
            "Video upload complete"
        );

        Ok(updated)
    }

    /// Store an image in the assets directory and point the record's thumbnail at it.
    #[tracing::instrument(skip(self, body))]
    pub async fn upload_thumbnail<R>(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        content_type: &str,
        mut body: R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let video = self.owned_video(video_id, user_id).await?;

        let media_type = MediaType::parse(content_type)?;
        let extension = media_type.image_extension().ok_or_else(|| {
            AppError::UnsupportedMediaType("Invalid file type, must be an image".to_string())
        })?;

        let data = read_bounded(&mut body, self.settings.max_thumbnail_bytes).await?;

        let key = thumbnail_key(extension);
        let url = self.assets.put(&key, &media_type.essence(), data).await?;

        let updated = self
            .record_or_rollback(video.with_thumbnail_url(url), self.assets.as_ref(), &key)
            .await?;

        tracing::info!(video_id = %video_id, key = %key, "Thumbnail upload complete");

        Ok(updated)
    }

    /// Any lookup failure, a missing record included, is a server error here.
    async fn owned_video(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self.videos.get(video_id).await.map_err(|err| {
            tracing::warn!(error = %err, video_id = %video_id, "Video lookup failed");
            AppError::Internal("Unable to lookup video by ID".to_string())
        })?;
        if !video.is_owned_by(user_id) {
            return Err(AppError::Unauthorized("Not the video owner".to_string()));
        }
        Ok(video)
    }

    /// Copy the body into a fresh file under the temp dir.
    async fn stage<R>(&self, body: &mut R) -> Result<TempPath, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        tokio::fs::create_dir_all(&self.settings.temp_dir).await?;

        let named = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".mp4")
            .tempfile_in(&self.settings.temp_dir)?;
        let (file, staged) = named.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let mut size: u64 = 0;
        loop {
            let n = body.read(&mut buf).await.map_err(read_failure)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await?;
            size += n as u64;
        }
        file.flush().await?;

        tracing::debug!(path = %staged.display(), size_bytes = size, "Upload staged");
        Ok(staged)
    }

    async fn orientation_of(&self, path: &Path) -> Result<Orientation, AppError> {
        let probe = self.tools.probe(path).await?;
        Ok(classify(&probe)?)
    }

    async fn remux(&self, staged: &Path) -> Result<TempPath, AppError> {
        // Guard the output before the tool runs so a partial file is removed too.
        let expected = TempPath::from_path(remux_output_path(staged));
        let written = self.tools.remux(staged).await?;
        if written.as_path() == &*expected {
            Ok(expected)
        } else {
            Ok(TempPath::from_path(written))
        }
    }

    /// Persist `video`; if that fails, remove the object just stored under `key`.
    async fn record_or_rollback(
        &self,
        video: Video,
        storage: &dyn Storage,
        key: &str,
    ) -> Result<Video, AppError> {
        match self.videos.update(&video).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                if let Err(delete_err) = storage.delete(key).await {
                    tracing::warn!(
                        error = %delete_err,
                        key = %key,
                        "Failed to remove stored object after metadata update failure"
                    );
                }
                Err(err)
            }
        }
    }
}

/// Wrap an error raised while reading an upload body so the pipeline reports
/// it as-is instead of as a generic read failure.
pub fn body_read_error(err: AppError) -> io::Error {
    io::Error::other(err)
}

fn read_failure(err: io::Error) -> AppError {
    match err.into_inner() {
        Some(inner) => match inner.downcast::<AppError>() {
            Ok(app_err) => *app_err,
            Err(other) => AppError::BadRequest(format!("Failed to read upload: {}", other)),
        },
        None => AppError::BadRequest("Failed to read upload".to_string()),
    }
}

async fn read_bounded<R>(body: &mut R, limit: usize) -> Result<Vec<u8>, AppError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut data = Vec::new();
    let mut limited = body.take(limit as u64 + 1);
    limited
        .read_to_end(&mut data)
        .await
        .map_err(read_failure)?;
    if data.len() > limit {
        return Err(AppError::PayloadTooLarge(format!(
            "Thumbnail exceeds {} bytes",
            limit
        )));
    }
    Ok(data)
}
