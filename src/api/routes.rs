use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::{cors_layer, security_headers};
use crate::AppState;

/// Room for multipart boundaries and part headers on top of the file cap,
/// so that a file of exactly the maximum size still fits in the body.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;

    Router::new()
        // Web UI
        .route("/", get(handlers::index))
        // Uploads
        .route(
            "/upload",
            post(handlers::upload_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/upload",
            post(handlers::upload_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Retrieval
        .route("/download/:id", get(handlers::download_file))
        .route("/info/:id", get(handlers::file_info))
        .route("/api/info/:id", get(handlers::api_file_info))
        // Internal
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
