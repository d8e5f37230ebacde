use std::io;
use thiserror::Error;
use tubely_core::AppError;

/// Failures of the external media tools and their output.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("ffprobe failed: {0}")]
    ProbeFailed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParseFailed(String),

    #[error("No streams found in video")]
    NoStreamsFound,

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("ffmpeg remux failed: {0}")]
    RemuxFailed(String),

    #[error("{tool} timed out after {seconds}s")]
    ToolTimeout { tool: &'static str, seconds: u64 },

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            // The upload itself is unusable; nothing to retry.
            ProcessingError::NoStreamsFound | ProcessingError::InvalidDimensions { .. } => {
                AppError::BadRequest(err.to_string())
            }
            ProcessingError::Io(e) => AppError::Internal(format!("IO error: {}", e)),
            other => AppError::MediaProcessing(other.to_string()),
        }
    }
}
