//! Telemetry and observability module
//!
//! Structured logging with `tracing`, configured from [`TelemetryConfig`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::error::{HeaderError, HeadersResult};

/// Initialize the telemetry subsystem
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init_telemetry(config: &TelemetryConfig) -> HeadersResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(json_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_target(true)
            .compact();

        subscriber.with(fmt_layer).try_init()
    };

    result.map_err(|e| HeaderError::Config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        service = %config.service_name,
        version = %env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Log a header that could not be produced for a response
#[inline]
pub fn log_header_error(header: &str, error: &HeaderError) {
    tracing::error!(
        header = %header,
        error = %error,
        error_type = %error.error_type(),
        "Failed to apply security header"
    );
}
