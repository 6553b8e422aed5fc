//! CLI command implementations

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use axum::body::Body;
use axum::http::header;
use axum::response::Response;

use crate::config::SecureHeadersConfig;
use crate::csp::{generate_nonce, parse_policy, CspOptions, ScriptDirective, SourceDirective, StyleDirective};
use crate::html::{HttpFetcher, IntegrityResolver};
use crate::security::SecureHeaders;
use crate::telemetry::init_telemetry;
use crate::VERSION;

use super::{
    Cli, Commands, ConfigAction, ConfigCommand, CspAction, CspCommand, HeadersCommand,
    IntegrityCommand, ServeCommand,
};

/// Execute the CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = if let Some(path) = &cli.config {
        SecureHeadersConfig::from_file(path)?
    } else {
        SecureHeadersConfig::from_env()?
    };

    config.telemetry.log_level = cli.log_level.clone();
    config.telemetry.json_logs |= cli.json_logs;

    match cli.command {
        Commands::Serve(cmd) => execute_serve(cmd, config, cli.quiet).await,
        Commands::Csp(cmd) => execute_csp(cmd),
        Commands::Headers(cmd) => execute_headers(cmd, &config),
        Commands::Integrity(cmd) => execute_integrity(cmd, &config).await,
        Commands::Config(cmd) => execute_config(cmd, config),
        Commands::Version => execute_version(),
    }
}

/// Execute the serve command
async fn execute_serve(cmd: ServeCommand, mut config: SecureHeadersConfig, quiet: bool) -> Result<()> {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(environment) = cmd.environment {
        config.environment = environment;
    }
    if let Some(csp) = cmd.csp {
        config.headers.content_security_policy = Some(csp);
    }
    if cmd.redirect_filter || !cmd.allow_redirect.is_empty() {
        config.redirect.enabled = true;
        config.redirect.allowed_bases.extend(cmd.allow_redirect);
    }
    config.headers.trust_forwarded_proto |= cmd.trust_forwarded_proto;

    config.validate().context("Configuration validation failed")?;

    if !quiet {
        print_banner(&config);
    }

    crate::run_server(config).await
}

/// Execute a `csp` subcommand
fn execute_csp(cmd: CspCommand) -> Result<()> {
    match cmd.action {
        CspAction::Parse { policy } => {
            let options = parse_policy(&policy).context("Invalid Content-Security-Policy")?;
            let canonical = options.to_string();
            if canonical.is_empty() {
                println!("(empty policy)");
            } else {
                for directive in canonical.split("; ") {
                    println!("{}", directive);
                }
            }
            Ok(())
        }

        CspAction::Hash {
            file,
            text,
            algorithm,
            directive,
        } => {
            let content = match (text, file) {
                (Some(text), _) => text.into_bytes(),
                (None, Some(path)) => std::fs::read(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                (None, None) => {
                    let mut buffer = Vec::new();
                    io::stdin().read_to_end(&mut buffer)?;
                    buffer
                }
            };

            let source = match directive.as_str() {
                "script" => format!(
                    "script-src {}",
                    ScriptDirective::empty().add_hash_of(&content, algorithm)?
                ),
                "style" => format!(
                    "style-src {}",
                    StyleDirective::empty().add_hash_of(&content, algorithm)?
                ),
                other => bail!("Unknown directive '{}', expected script or style", other),
            };

            println!("{}", source);
            Ok(())
        }

        CspAction::Nonce { count } => {
            for _ in 0..count {
                println!("{}", generate_nonce());
            }
            Ok(())
        }

        CspAction::Default => {
            println!("{}", CspOptions::default());
            Ok(())
        }
    }
}

/// Execute the headers command
fn execute_headers(cmd: HeadersCommand, config: &SecureHeadersConfig) -> Result<()> {
    let secure_headers = SecureHeaders::from_config(config)?;

    let mut builder = Response::builder()
        .status(cmd.status)
        .header(header::CONTENT_TYPE, &cmd.content_type);
    if cmd.attachment {
        builder = builder.header(header::CONTENT_DISPOSITION, "attachment");
    }
    let mut response = builder.body(Body::empty())?;

    secure_headers.apply(cmd.tls, &mut response);

    let mut lines: Vec<String> = response
        .headers()
        .iter()
        .filter(|(name, _)| *name != header::CONTENT_TYPE && *name != header::CONTENT_DISPOSITION)
        .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect();
    lines.sort();

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Execute the integrity command
async fn execute_integrity(cmd: IntegrityCommand, config: &SecureHeadersConfig) -> Result<()> {
    init_telemetry(&config.telemetry)?;

    let resolver = IntegrityResolver::new(HttpFetcher::new()?).with_algorithm(cmd.algorithm);
    let integrity = resolver.integrity_for(&cmd.url).await?;

    println!("integrity=\"{}\" crossorigin=\"anonymous\"", integrity);
    Ok(())
}

/// Execute a `config` subcommand
fn execute_config(cmd: ConfigCommand, config: SecureHeadersConfig) -> Result<()> {
    match cmd.action {
        ConfigAction::Show { format } => {
            let output = match format.as_str() {
                "toml" => toml::to_string_pretty(&config)?,
                "json" => serde_json::to_string_pretty(&config)?,
                _ => serde_yaml::to_string(&config)?,
            };
            println!("{}", output);
            Ok(())
        }

        ConfigAction::Validate { file } => {
            let config = SecureHeadersConfig::from_file(&file)?;
            println!("Configuration at {:?} is valid", file);
            println!("  Environment:     {:?}", config.environment);
            println!(
                "  CSP:             {}",
                config.headers.content_security_policy.as_deref().unwrap_or("disabled")
            );
            println!(
                "  Redirect filter: {}",
                if config.redirect.enabled { "enabled" } else { "disabled" }
            );
            Ok(())
        }

        ConfigAction::Init { output, preset, force } => {
            if output.exists() && !force {
                bail!("File {:?} already exists. Use --force to overwrite.", output);
            }

            let config = match preset.as_str() {
                "production" => SecureHeadersConfig::production(),
                _ => SecureHeadersConfig::default(),
            };

            let content = config.to_string_for_path(&output)?;
            std::fs::write(&output, content)?;
            println!("Created configuration file: {:?}", output);
            println!("Preset: {}", preset);
            Ok(())
        }

        ConfigAction::Env => {
            println!("Environment Variable Mappings:");
            println!();
            for (name, description) in [
                ("SECURE_HEADERS_CONFIG", "Configuration file path"),
                ("SECURE_HEADERS_PORT", "Server port (default: 8080)"),
                ("SECURE_HEADERS_HOST", "Server host (default: 127.0.0.1)"),
                ("SECURE_HEADERS_ENVIRONMENT", "development or production"),
                ("SECURE_HEADERS_CSP", "Content-Security-Policy header value"),
                ("SECURE_HEADERS_TRUST_FORWARDED_PROTO", "Honour X-Forwarded-Proto (true/false)"),
                ("SECURE_HEADERS_JSON_LOGS", "Enable JSON log format"),
                ("SECURE_HEADERS_LOG_LEVEL", "Log level (trace/debug/info/warn/error)"),
                ("RUST_LOG", "Log filter, overrides the log level"),
            ] {
                println!("  {:<40} {}", name, description);
            }
            Ok(())
        }
    }
}

fn execute_version() -> Result<()> {
    println!("secure-headers {}", VERSION);
    println!();
    println!("Build Information:");
    println!("  Version:       {}", VERSION);
    println!("  Rust Version:  {}", env!("CARGO_PKG_RUST_VERSION"));
    println!();
    println!("Features:");
    println!("  Content-Security-Policy parsing and serialization");
    println!("  HSTS, frame, referrer, permissions and legacy security headers");
    println!("  Open-redirect filtering");
    println!("  Subresource integrity, noopener and insecure-resource upgrades");
    Ok(())
}

fn print_banner(config: &SecureHeadersConfig) {
    println!("secure-headers v{}", VERSION);
    println!();
    println!("Configuration:");
    println!("  • Server:      {}:{}", config.server.host, config.server.port);
    println!("  • Environment: {:?}", config.environment);
    println!(
        "  • Redirects:   {}",
        if config.redirect.enabled { "filtered" } else { "unfiltered" }
    );
    println!();
    println!("Endpoints:");
    for path in ["/", "/frame", "/download", "/redirect?to=", "/error", "/integrity?url=", "/health"] {
        println!("  • http://{}:{}{}", config.server.host, config.server.port, path);
    }
    println!();
}
