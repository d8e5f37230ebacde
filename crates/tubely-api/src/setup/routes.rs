//! Route configuration and setup

pub mod health;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::auth::JwtService;
use crate::error::error_details_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use tubely_infra::request_id_middleware;

/// Room for multipart boundaries and part headers on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        jwt: JwtService::new(&config.jwt_secret),
    };

    let protected_routes = protected_routes(config).layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let app = public_routes()
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .nest_service("/assets", ServeDir::new(&config.assets_root))
        .layer(RequestBodyLimitLayer::new(
            config
                .max_video_upload_bytes
                .max(config.max_thumbnail_upload_bytes)
                .saturating_add(FORM_OVERHEAD_BYTES),
        ))
        .layer(axum::middleware::from_fn_with_state(
            !config.is_production(),
            error_details_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn protected_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            "/api/videos/{video_id}",
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            "/api/video_upload/{video_id}",
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(
                config
                    .max_video_upload_bytes
                    .saturating_add(FORM_OVERHEAD_BYTES),
            )),
        )
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail).layer(DefaultBodyLimit::max(
                config
                    .max_thumbnail_upload_bytes
                    .saturating_add(FORM_OVERHEAD_BYTES),
            )),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };

    Ok(cors)
}
