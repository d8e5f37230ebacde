use tubely_core::models::{Orientation, ProbeResult};

use crate::error::ProcessingError;

/// Classify a probed video.
///
/// A declared `16:9` or `9:16` wins. Without a declared ratio the shape is
/// derived from `height / width`: strictly inside (0.45, 1.0) is portrait,
/// strictly inside (1.0, 2.0) is landscape, anything else (boundaries
/// included) is other. Any other declared ratio is other.
pub fn classify(probe: &ProbeResult) -> Result<Orientation, ProcessingError> {
    match probe.display_aspect_ratio.as_str() {
        "16:9" => Ok(Orientation::Landscape),
        "9:16" => Ok(Orientation::Portrait),
        "" => {
            if probe.width == 0 || probe.height == 0 {
                return Err(ProcessingError::InvalidDimensions {
                    width: probe.width,
                    height: probe.height,
                });
            }
            let ratio = f64::from(probe.height) / f64::from(probe.width);
            if ratio > 0.45 && ratio < 1.0 {
                Ok(Orientation::Portrait)
            } else if ratio > 1.0 && ratio < 2.0 {
                Ok(Orientation::Landscape)
            } else {
                Ok(Orientation::Other)
            }
        }
        _ => Ok(Orientation::Other),
    }
}
