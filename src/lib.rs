//! # secure-headers
//!
//! HTTP security response headers for axum services, built around a typed
//! Content-Security-Policy model.
//!
//! ## Features
//!
//! - **Content-Security-Policy**: typed directives, a lenient parser and a
//!   canonical serializer, nonces and inline-content hashes
//! - **Security headers**: HSTS, X-Frame-Options, Referrer-Policy,
//!   Permissions-Policy, Report-To, X-Robots-Tag and the legacy headers
//! - **Per-response overrides**: handlers can loosen frame, UA-compatibility
//!   and permissions settings for a single response
//! - **Redirect filter**: blocks `Location` headers pointing off-site
//! - **HTML helpers**: `noopener`, insecure resource upgrades and
//!   subresource integrity
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use secure_headers::{apply_security_middleware, SecureHeadersConfig, SecurityState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SecureHeadersConfig::default();
//!     let security = SecurityState::new(&config)?;
//!
//!     let app: Router = apply_security_middleware(
//!         Router::new().route("/", get(|| async { "hello" })),
//!         security,
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod csp;
pub mod error;
pub mod headers;
pub mod html;
pub mod security;
pub mod server;
pub mod telemetry;

pub use config::SecureHeadersConfig;
pub use csp::CspOptions;
pub use error::{HeaderError, HeadersResult};
pub use security::{apply_security_middleware, SecureHeaders, SecurityState};
pub use server::run_server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;
