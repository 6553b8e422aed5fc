//! Route definitions

use axum::{routing::get, Router};

use super::handlers;
use super::state::AppState;

/// Pages exercising the security headers and HTML helpers
pub fn demo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/frame", get(handlers::frame))
        .route("/download", get(handlers::download))
        .route("/redirect", get(handlers::redirect))
        .route("/error", get(handlers::error_page))
        .route("/integrity", get(handlers::integrity))
}

/// Health and info routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/version", get(handlers::version))
}
