use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::parse_video_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

/// Fetch a record and require that `user_id` owns it.
async fn owned_video(state: &AppState, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
    let video = state.videos.get(video_id).await?;
    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized("Not the video owner".to_string()));
    }
    Ok(video)
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoParams,
    responses(
        (status = 201, description = "Draft video created", body = Video),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, params), fields(user_id = %user.user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(params): ValidatedJson<CreateVideoParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state.videos.create(user.user_id, params).await?;
    tracing::info!(video_id = %video.id, "Video draft created");

    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = Vec<Video>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.videos.list_for_user(user.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 401, description = "Not the video owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = owned_video(&state, video_id, user.user_id).await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 401, description = "Not the video owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    owned_video(&state, video_id, user.user_id).await?;
    state.videos.delete(video_id).await?;

    tracing::info!(video_id = %video_id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
