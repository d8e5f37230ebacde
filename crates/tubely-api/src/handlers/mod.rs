pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use tubely_core::AppError;
use uuid::Uuid;

/// Parse a `{video_id}` path segment.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))
}

/// Map a failure while reading a multipart body.
pub(crate) fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Unable to parse form file: {}", err.body_text()))
    }
}
