//! OpenAPI documentation served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use tubely_core::models;
use tubely_infra::ErrorResponse;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video and thumbnail uploads. Uploaded MP4s are remuxed for fast start and stored under an orientation prefix; thumbnails are served from /assets."
    ),
    paths(
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::videos::delete_video,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(schemas(
        models::Video,
        models::CreateVideoParams,
        models::Orientation,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video metadata records"),
        (name = "uploads", description = "Video and thumbnail uploads")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_upload_routes() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/video_upload/{video_id}"));
        assert!(spec.paths.paths.contains_key("/api/thumbnail_upload/{video_id}"));
        assert!(spec.paths.paths.contains_key("/api/videos/{video_id}"));
    }
}
