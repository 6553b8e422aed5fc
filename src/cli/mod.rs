//! Command-line interface
//!
//! Subcommands for:
//! - Running the demo server behind the security middleware
//! - Parsing, hashing and generating Content-Security-Policy material
//! - Previewing the headers a configuration produces
//! - Managing configuration files

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use crate::config::Environment;
use crate::csp::HashAlgorithm;
use crate::VERSION;

/// secure-headers: HTTP security headers and CSP tooling
#[derive(Parser, Debug)]
#[command(name = "secure-headers")]
#[command(version = VERSION)]
#[command(about = "HTTP security response headers and Content-Security-Policy tooling")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration file path (YAML, TOML, or JSON)
    #[arg(short, long, global = true, env = "SECURE_HEADERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Global log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SECURE_HEADERS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON log output
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Quiet mode - suppress banner and non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the demo server
    #[command(alias = "s")]
    Serve(ServeCommand),

    /// Content-Security-Policy tools
    Csp(CspCommand),

    /// Print the headers the configuration adds to a response
    Headers(HeadersCommand),

    /// Compute the subresource integrity value of a remote resource
    #[command(alias = "sri")]
    Integrity(IntegrityCommand),

    /// Configuration management
    #[command(alias = "cfg")]
    Config(ConfigCommand),

    /// Show version and build information
    Version,
}

/// Start the demo server
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Hosting environment (development, production)
    #[arg(short, long)]
    pub environment: Option<Environment>,

    /// Content-Security-Policy to send instead of the configured one
    #[arg(long)]
    pub csp: Option<String>,

    /// Check Location headers of every response
    #[arg(long)]
    pub redirect_filter: bool,

    /// Extra base URL redirects may point under (repeatable)
    #[arg(long = "allow-redirect")]
    pub allow_redirect: Vec<Url>,

    /// Honour X-Forwarded-Proto when deciding whether a request used TLS
    #[arg(long)]
    pub trust_forwarded_proto: bool,
}

/// Content-Security-Policy tools
#[derive(Parser, Debug)]
pub struct CspCommand {
    #[command(subcommand)]
    pub action: CspAction,
}

#[derive(Subcommand, Debug)]
pub enum CspAction {
    /// Parse a policy and print its canonical form
    Parse {
        /// Raw policy, e.g. "default-src 'self'; img-src data:"
        policy: String,
    },

    /// Hash an inline script or style for use in a source list
    Hash {
        /// File holding the inline content (stdin if omitted)
        file: Option<PathBuf>,

        /// Hash this text instead of a file
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Hash algorithm (sha256, sha384, sha512)
        #[arg(short, long, default_value = "sha256")]
        algorithm: HashAlgorithm,

        /// Directive to print the source for (script, style)
        #[arg(short, long, default_value = "script")]
        directive: String,
    },

    /// Generate random nonces
    Nonce {
        /// Number of nonces to generate
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Print the secure default policy
    Default,
}

/// Preview response headers
#[derive(Parser, Debug)]
pub struct HeadersCommand {
    /// Treat the request as arriving over TLS
    #[arg(long)]
    pub tls: bool,

    /// Response Content-Type
    #[arg(long, default_value = "text/html; charset=utf-8")]
    pub content_type: String,

    /// Mark the response as a download
    #[arg(long)]
    pub attachment: bool,

    /// Response status code
    #[arg(long, default_value = "200")]
    pub status: u16,
}

/// Compute subresource integrity
#[derive(Parser, Debug)]
pub struct IntegrityCommand {
    /// Absolute URL of the script or stylesheet
    pub url: Url,

    /// Hash algorithm (sha256, sha384, sha512)
    #[arg(short, long, default_value = "sha256")]
    pub algorithm: HashAlgorithm,
}

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (yaml, toml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        file: PathBuf,
    },

    /// Initialize a new configuration file
    Init {
        /// Output file path; the extension picks the format
        #[arg(short, long, default_value = "secure-headers.yaml")]
        output: PathBuf,

        /// Configuration preset (standard, production)
        #[arg(short, long, default_value = "standard")]
        preset: String,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show environment variable mappings
    Env,
}
