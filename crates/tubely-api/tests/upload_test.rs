mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::TestUser;
use helpers::tools::FakeMediaTools;
use helpers::{list_files, setup_test_app, setup_test_app_with_tools, ASSETS_BASE_URL, VIDEOS_BASE_URL};
use serde_json::Value;
use uuid::Uuid;

const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isomfake-mdat";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRfake-png";

fn video_form(content_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from_static(MP4_BYTES))
        .file_name("boots.mp4")
        .mime_type(content_type);
    MultipartForm::new().add_part("video", part)
}

fn thumbnail_form(data: Vec<u8>, content_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("thumbnail")
        .mime_type(content_type);
    MultipartForm::new().add_part("thumbnail", part)
}

/// Upload path of the stored object, relative to the storage base URL.
fn stored_key<'a>(url: &'a str, base: &str) -> &'a str {
    url.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_else(|| panic!("{} does not start with {}", url, base))
}

#[tokio::test]
async fn test_upload_requires_token() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 401);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Couldn't find JWT");
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(app.video(video.id).await.video_url.is_none());
}

#[tokio::test]
async fn test_upload_rejects_expired_token() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header(
            "Authorization",
            format!("Bearer {}", helpers::auth::expired_token(owner.user_id)),
        )
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["error"], "Token has expired");
}

#[tokio::test]
async fn test_landscape_upload_stores_faststart_copy() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    let url = body["video_url"].as_str().expect("video_url set");

    let key = stored_key(url, VIDEOS_BASE_URL);
    let name = key.strip_prefix("landscape/").expect("landscape prefix");
    let id = name.strip_suffix(".mp4").expect(".mp4 suffix");
    assert_eq!(id.len(), 22);
    assert!(id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    let stored = std::fs::read(app.videos_dir.path().join(key)).expect("object stored");
    assert_eq!(stored, MP4_BYTES);

    let record = app.video(video.id).await;
    assert_eq!(record.video_url.as_deref(), Some(url));
    assert_eq!(record.title, "Boots");
    assert!(record.thumbnail_url.is_none());
    assert!(app.staged_files().is_empty(), "staging files left: {:?}", app.staged_files());
}

#[tokio::test]
async fn test_portrait_upload_uses_portrait_prefix() {
    let app = setup_test_app_with_tools(FakeMediaTools::reporting(1080, 1920, "")).await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Vertical").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let url = response.json::<Value>()["video_url"]
        .as_str()
        .expect("video_url set")
        .to_string();
    assert!(stored_key(&url, VIDEOS_BASE_URL).starts_with("portrait/"));
}

#[tokio::test]
async fn test_avi_upload_rejected_without_side_effects() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(video_form("video/avi"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(body["error"], "Only MP4 videos are allowed for upload");

    assert_eq!(app.video(video.id).await, video);
    assert!(app.staged_files().is_empty());
    assert!(list_files(app.videos_dir.path()).is_empty());
}

#[tokio::test]
async fn test_probe_failure_cleans_up() {
    let app = setup_test_app_with_tools(FakeMediaTools::failing_probe()).await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Broken").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "MEDIA_PROCESSING_ERROR");
    assert!(body.get("details").is_none(), "tool output must not leak");

    assert!(app.video(video.id).await.video_url.is_none());
    assert!(app.staged_files().is_empty());
    assert!(list_files(app.videos_dir.path()).is_empty());
}

#[tokio::test]
async fn test_upload_by_non_owner_is_unauthorized() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let intruder = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", intruder.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(app.video(video.id).await, video);
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_malformed_video_id() {
    let app = setup_test_app().await;
    let user = TestUser::new();

    let response = app
        .client()
        .post("/api/video_upload/not-a-uuid")
        .add_header("Authorization", user.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"], "Invalid ID");
}

#[tokio::test]
async fn test_unknown_video_id_is_internal_error() {
    let app = setup_test_app().await;
    let user = TestUser::new();

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", Uuid::new_v4()))
        .add_header("Authorization", user.bearer())
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert!(body.get("details").is_none());
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_missing_video_part() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let part = Part::bytes(bytes::Bytes::from_static(MP4_BYTES))
        .file_name("boots.mp4")
        .mime_type("video/mp4");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_png_thumbnail_is_served_from_assets() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app
        .create_video(owner.user_id, "Boots")
        .await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(thumbnail_form(PNG_BYTES.to_vec(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    let url = body["thumbnail_url"].as_str().expect("thumbnail_url set");
    let name = stored_key(url, ASSETS_BASE_URL);
    assert!(name.ends_with(".png"));
    assert!(body["video_url"].is_null());

    let on_disk = std::fs::read(app.assets_dir.path().join(name)).expect("thumbnail written");
    assert_eq!(on_disk, PNG_BYTES);

    let served = app.client().get(&format!("/assets/{}", name)).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.as_bytes().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_thumbnail_keeps_existing_video_url() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let uploaded = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(uploaded.status_code(), 200);
    let video_url = uploaded.json::<Value>()["video_url"].clone();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(thumbnail_form(PNG_BYTES.to_vec(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["video_url"], video_url);
}

#[tokio::test]
async fn test_non_image_thumbnail_rejected() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(thumbnail_form(b"plain text".to_vec(), "text/plain"))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"], "Invalid file type, must be an image");
    assert!(app.video(video.id).await.thumbnail_url.is_none());
    assert!(list_files(app.assets_dir.path()).is_empty());
}

#[tokio::test]
async fn test_thumbnail_by_non_owner_is_unauthorized() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let intruder = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", intruder.bearer())
        .multipart(thumbnail_form(PNG_BYTES.to_vec(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(app.video(video.id).await.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_oversized_thumbnail_rejected() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let video = app.create_video(owner.user_id, "Boots").await;

    // Above the 64 KiB thumbnail limit of the test configuration
    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", owner.bearer())
        .multipart(thumbnail_form(vec![0u8; 100 * 1024], "image/png"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.video(video.id).await.thumbnail_url.is_none());
    assert!(list_files(app.assets_dir.path()).is_empty());
}
