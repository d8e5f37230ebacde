//! ffprobe invocation and output parsing

use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use tubely_core::models::ProbeResult;

use crate::error::ProcessingError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    display_aspect_ratio: String,
}

/// Arguments for `ffprobe`: JSON stream metadata for a single file.
pub fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-print_format", "json", "-show_streams"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_owned());
    args
}

/// Parse ffprobe's JSON output. Only the first stream is inspected.
pub fn parse_probe_output(stdout: &[u8]) -> Result<ProbeResult, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::ProbeParseFailed(e.to_string()))?;

    let first = output.streams.first().ok_or(ProcessingError::NoStreamsFound)?;

    Ok(ProbeResult {
        stream_count: output.streams.len(),
        width: first.width,
        height: first.height,
        display_aspect_ratio: first.display_aspect_ratio.clone(),
    })
}
