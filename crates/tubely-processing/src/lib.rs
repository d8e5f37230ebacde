//! Tubely Processing Library
//!
//! The video upload pipeline and the adapters it drives:
//!
//! - [`probe`]: runs `ffprobe` and parses the first stream's geometry
//! - [`orientation`]: maps a probe result to `portrait`, `landscape` or `other`
//! - [`remux`]: rewrites an MP4 with its index at the front (`-movflags faststart`)
//! - [`tools`]: the [`MediaTools`] seam over the two external tools
//! - [`pipeline`]: stage, probe, classify, remux, store, record

pub mod content_type;
pub mod error;
pub mod orientation;
pub mod pipeline;
pub mod probe;
pub mod remux;
pub mod tools;

pub use content_type::MediaType;
pub use error::ProcessingError;
pub use orientation::classify;
pub use pipeline::{PipelineSettings, UploadPipeline};
pub use tools::{FfmpegTools, MediaTools};
