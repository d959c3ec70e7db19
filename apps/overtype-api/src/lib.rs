//! Overtype API server library
//!
//! The router is built here so integration tests can drive it in-process
//! with `tower::util::ServiceExt` without binding a socket.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;

/// Uploads beyond this are rejected before any processing.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
pub fn app() -> Router {
    // CORS configuration for the browser client
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(handlers::health))
        // Export endpoints
        .route("/api/pdf/edit", post(handlers::edit))
        .route("/api/pdf/annotate", post(handlers::annotate))
        // Add middleware
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
