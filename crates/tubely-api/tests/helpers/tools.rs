use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tubely_core::models::ProbeResult;
use tubely_processing::remux::remux_output_path;
use tubely_processing::{MediaTools, ProcessingError};

/// Stand-in for ffprobe/ffmpeg. Remux writes a copy of the input to the
/// usual `.processing` path.
pub struct FakeMediaTools {
    probe: Option<ProbeResult>,
}

impl FakeMediaTools {
    pub fn reporting(width: u32, height: u32, ratio: &str) -> Self {
        Self {
            probe: Some(ProbeResult {
                stream_count: 1,
                width,
                height,
                display_aspect_ratio: ratio.to_string(),
            }),
        }
    }

    pub fn landscape() -> Self {
        Self::reporting(1920, 1080, "16:9")
    }

    /// Probe exits non-zero, as it does for a file that is not a video.
    pub fn failing_probe() -> Self {
        Self { probe: None }
    }
}

#[async_trait]
impl MediaTools for FakeMediaTools {
    async fn probe(&self, _path: &Path) -> Result<ProbeResult, ProcessingError> {
        self.probe.clone().ok_or_else(|| {
            ProcessingError::ProbeFailed("exit status: 1: moov atom not found".to_string())
        })
    }

    async fn remux(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let output = remux_output_path(path);
        tokio::fs::copy(path, &output).await?;
        Ok(output)
    }
}
