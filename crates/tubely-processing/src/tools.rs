use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tubely_core::models::ProbeResult;

use crate::error::ProcessingError;
use crate::probe::{parse_probe_output, probe_args};
use crate::remux::{remux_args, remux_output_path};

/// The external media tools the video pipeline depends on.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Inspect a local file and report its first stream's geometry.
    async fn probe(&self, path: &Path) -> Result<ProbeResult, ProcessingError>;

    /// Write a fast-start copy of `path` and return where it was written.
    ///
    /// The output path is [`remux_output_path`] of the input; the caller owns
    /// cleanup of both files.
    async fn remux(&self, path: &Path) -> Result<PathBuf, ProcessingError>;
}

/// `ffprobe` / `ffmpeg` binaries invoked as child processes.
///
/// Each invocation is bounded by `timeout`. Children are killed when the
/// future driving them is dropped, so an abandoned request stops its tools.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffprobe_path: String,
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegTools {
    pub fn new(ffprobe_path: String, ffmpeg_path: String, timeout: Duration) -> Self {
        Self {
            ffprobe_path,
            ffmpeg_path,
            timeout,
        }
    }

    async fn run(
        &self,
        tool: &'static str,
        program: &str,
        args: Vec<OsString>,
    ) -> Result<Output, ProcessingError> {
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(ProcessingError::Spawn { tool, source }),
            Err(_) => Err(ProcessingError::ToolTimeout {
                tool,
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl MediaTools for FfmpegTools {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<ProbeResult, ProcessingError> {
        let start = std::time::Instant::now();

        let output = self.run("ffprobe", &self.ffprobe_path, probe_args(path)).await?;

        if !output.status.success() {
            return Err(ProcessingError::ProbeFailed(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let probe = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = probe.width,
            height = probe.height,
            display_aspect_ratio = %probe.display_aspect_ratio,
            stream_count = probe.stream_count,
            "Video probe completed"
        );

        Ok(probe)
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        let output_path = remux_output_path(path);

        let output = self
            .run("ffmpeg", &self.ffmpeg_path, remux_args(path, &output_path))
            .await?;

        if !output.status.success() {
            return Err(ProcessingError::RemuxFailed(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let tools = FfmpegTools::new(
            "/nonexistent/tubely-ffprobe".to_string(),
            "/nonexistent/tubely-ffmpeg".to_string(),
            Duration::from_secs(5),
        );

        let err = tools.probe(Path::new("/tmp/x.mp4")).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Spawn { tool: "ffprobe", .. }));

        let err = tools.remux(Path::new("/tmp/x.mp4")).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Spawn { tool: "ffmpeg", .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_probe_failure() {
        // `false` ignores its arguments and exits 1.
        let tools = FfmpegTools::new(
            "false".to_string(),
            "false".to_string(),
            Duration::from_secs(5),
        );

        let err = tools.probe(Path::new("/tmp/x.mp4")).await.unwrap_err();
        assert!(matches!(err, ProcessingError::ProbeFailed(_)));

        let err = tools.remux(Path::new("/tmp/x.mp4")).await.unwrap_err();
        assert!(matches!(err, ProcessingError::RemuxFailed(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_tool_times_out() {
        let tools = FfmpegTools::new(
            "ffprobe".to_string(),
            "ffmpeg".to_string(),
            Duration::from_millis(200),
        );

        let err = tools
            .run("ffprobe", "sleep", vec![OsString::from("5")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::ToolTimeout { tool: "ffprobe", .. }));
    }
}
