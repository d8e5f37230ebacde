use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{multipart_error, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use std::pin::pin;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_processing::pipeline::body_read_error;

pub const THUMBNAIL_FIELD: &str = "thumbnail";

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a `thumbnail` file part (image/*)"),
    responses(
        (status = 200, description = "Thumbnail stored and record updated", body = Video),
        (status = 400, description = "Malformed ID, form or non-image content type", body = ErrorResponse),
        (status = 401, description = "Missing token or not the video owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let mut multipart = multipart?;

    tracing::info!(video_id = %video_id, "Uploading thumbnail");

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let body = pin!(StreamReader::new(
            field.map_err(|e| body_read_error(multipart_error(e)))
        ));

        let video: Video = state
            .pipeline
            .upload_thumbnail(video_id, user.user_id, &content_type, body)
            .await?;
        return Ok(Json(video));
    }

    Err(AppError::BadRequest("Unable to parse form file: missing `thumbnail` part".to_string()).into())
}
