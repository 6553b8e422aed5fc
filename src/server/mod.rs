//! Demo HTTP server
//!
//! Serves a handful of pages behind the security middleware so the headers,
//! per-response overrides and redirect filter can be observed end to end.

mod handlers;
mod middleware;
mod routes;
mod state;

pub use handlers::*;
pub use routes::*;
pub use state::*;

use std::net::SocketAddr;

use axum::{middleware as axum_middleware, Router};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::SecureHeadersConfig;
use crate::security::{apply_security_middleware, SecurityState};
use crate::telemetry::init_telemetry;

/// Run the demo server until Ctrl+C or SIGTERM
pub async fn run_server(config: SecureHeadersConfig) -> anyhow::Result<()> {
    init_telemetry(&config.telemetry)?;
    config.validate()?;

    let security_state = SecurityState::new(&config)?;
    let state = AppState::new(config.clone())?;
    let app = create_router(state, security_state);

    let addr: SocketAddr = config.server.socket_addr()?;

    info!(
        "Starting secure-headers v{} on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    info!("Environment: {:?}", config.environment);
    info!(
        "Content-Security-Policy: {}",
        config
            .headers
            .content_security_policy
            .as_deref()
            .unwrap_or("disabled")
    );
    info!(
        "Redirect filter: {}",
        if config.redirect.enabled { "enabled" } else { "disabled" }
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main router with all routes
pub fn create_router(state: AppState, security: SecurityState) -> Router {
    let config = state.config.clone();

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout));

    let base_router = Router::new()
        .merge(routes::demo_routes())
        .merge(routes::health_routes());

    let base_router = if config.server.request_logging {
        base_router.layer(axum_middleware::from_fn(middleware::logging_middleware))
    } else {
        base_router
    };

    apply_security_middleware(base_router, security)
        .layer(middleware)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
