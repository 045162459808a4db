//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, http::Method, routing::post, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

// Multipart framing overhead allowed on top of the upload cap. The handler
// enforces the exact cap on the staged payload itself.
const BODY_LIMIT_SLACK: usize = 16 * 1024 * 1024;

// Server-level concurrency limit to protect against resource exhaustion
// under extreme load. Uploads hold a staging file and a processing slot each.
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let auth_state = Arc::new(AuthState::new(&config.jwt_secret));

    // Protected routes (require authentication)
    // State is applied here for handlers with Multipart to work
    let api_routes = Router::new()
        .route("/api/videos/{video_id}", post(handlers::upload_video))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    let mut app = api_routes;

    // Local backend serves stored objects directly from disk
    if config.storage_backend == StorageBackend::Local {
        app = app.nest_service("/assets", ServeDir::new(&config.assets_root));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    app.layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + BODY_LIMIT_SLACK,
        ))
        .layer(RequestBodyLimitLayer::new(
            config.max_upload_bytes + BODY_LIMIT_SLACK,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
