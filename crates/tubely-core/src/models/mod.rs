//! Domain models shared by the storage, persistence, processing and API layers.

pub mod media;
pub mod video;

pub use media::{Orientation, ProbeResult, VideoProcessingMode};
pub use video::{CreateVideoParams, Video};
