use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Coarse classification of a video's frame shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Other,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Stream geometry reported by the media probe for the first stream of a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeResult {
    pub stream_count: usize,
    pub width: u32,
    pub height: u32,
    /// Declared display aspect ratio, e.g. `16:9`. Empty when not reported.
    pub display_aspect_ratio: String,
}

/// How uploaded videos are handled before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProcessingMode {
    /// Probe, classify and remux for fast start; keys carry an orientation prefix.
    FastStart,
    /// Store the staged upload unchanged.
    Passthrough,
}

impl FromStr for VideoProcessingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "faststart" | "fast-start" => Ok(VideoProcessingMode::FastStart),
            "passthrough" | "as-is" => Ok(VideoProcessingMode::Passthrough),
            _ => Err(anyhow::anyhow!("Invalid video processing mode: {}", s)),
        }
    }
}

impl Display for VideoProcessingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VideoProcessingMode::FastStart => write!(f, "faststart"),
            VideoProcessingMode::Passthrough => write!(f, "passthrough"),
        }
    }
}
