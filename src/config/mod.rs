//! Configuration module for secure-headers
//!
//! Provides configuration with support for:
//! - YAML/TOML/JSON config files
//! - Environment variable overrides
//! - Validation (including parsing the configured CSP)

mod headers;

pub use headers::HeadersConfig;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::{HeaderError, HeadersResult};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureHeadersConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
    /// Hosting environment
    pub environment: Environment,
    /// Security header settings
    pub headers: HeadersConfig,
    /// Redirect filter settings
    pub redirect: RedirectConfig,
}

impl SecureHeadersConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> HeadersResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| HeaderError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| HeaderError::Config(format!("YAML parse error: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| HeaderError::Config(format!("TOML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| HeaderError::Config(format!("JSON parse error: {}", e)))?,
            _ => {
                return Err(HeaderError::Config(
                    "Unsupported config file format. Use .yaml, .toml, or .json".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults plus environment variable overrides
    pub fn from_env() -> HeadersResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SECURE_HEADERS_*` environment variables on top of this config
    pub fn apply_env_overrides(&mut self) -> HeadersResult<()> {
        if let Ok(port) = std::env::var("SECURE_HEADERS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| HeaderError::Config("Invalid port number".to_string()))?;
        }

        if let Ok(host) = std::env::var("SECURE_HEADERS_HOST") {
            self.server.host = host;
        }

        if let Ok(env) = std::env::var("SECURE_HEADERS_ENVIRONMENT") {
            self.environment = env.parse()?;
        }

        if let Ok(csp) = std::env::var("SECURE_HEADERS_CSP") {
            self.headers.content_security_policy = Some(csp);
        }

        if let Ok(val) = std::env::var("SECURE_HEADERS_TRUST_FORWARDED_PROTO") {
            self.headers.trust_forwarded_proto = val.parse().unwrap_or(false);
        }

        if let Ok(val) = std::env::var("SECURE_HEADERS_JSON_LOGS") {
            self.telemetry.json_logs = val.parse().unwrap_or(false);
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> HeadersResult<()> {
        self.server.validate()?;
        self.headers.validate()?;
        self.redirect.validate()?;
        Ok(())
    }

    /// Configuration suitable for a production deployment
    pub fn production() -> Self {
        let mut config = Self::default();
        config.environment = Environment::Production;
        config.telemetry.json_logs = true;
        config.headers.trust_forwarded_proto = true;
        config
    }

    /// Serialize to the format implied by `path`'s extension
    pub fn to_string_for_path<P: AsRef<Path>>(&self, path: P) -> HeadersResult<String> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| HeaderError::Config(format!("TOML serialize error: {}", e))),
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| HeaderError::Config(format!("JSON serialize error: {}", e))),
            _ => serde_yaml::to_string(self)
                .map_err(|e| HeaderError::Config(format!("YAML serialize error: {}", e))),
        }
    }
}

/// Hosting environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer error pages get a relaxed CSP
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(HeaderError::Config(format!("Unknown environment '{}'", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Enable request logging
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            request_logging: true,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> HeadersResult<()> {
        if self.port == 0 {
            return Err(HeaderError::Config("server.port: Port cannot be 0".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(HeaderError::Config(
                "server.request_timeout: must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> HeadersResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| HeaderError::Config(format!("Invalid socket address: {}", e)))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable telemetry
    pub enabled: bool,
    /// Log level
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Service name attached to log lines
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "secure-headers".to_string(),
        }
    }
}

/// Redirect filter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Check `Location` headers on every response
    pub enabled: bool,
    /// Additional absolute base URLs redirects may point under
    pub allowed_bases: Vec<Url>,
}

impl RedirectConfig {
    pub fn validate(&self) -> HeadersResult<()> {
        if let Some(base) = self.allowed_bases.iter().find(|b| b.cannot_be_a_base()) {
            return Err(HeaderError::Config(format!(
                "redirect.allowed_bases: '{}' can't be used as a base URL",
                base
            )));
        }
        Ok(())
    }
}

/// Helper module for Duration serialization
pub(crate) mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let invalid = || format!("Invalid duration: {}", s);

        if let Some(millis) = s.strip_suffix("ms") {
            millis.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| invalid())
        } else if let Some(days) = s.strip_suffix('d') {
            days.trim()
                .parse::<u64>()
                .map(|d| Duration::from_secs(d * 24 * 60 * 60))
                .map_err(|_| invalid())
        } else if let Some(hours) = s.strip_suffix('h') {
            hours.trim()
                .parse::<u64>()
                .map(|h| Duration::from_secs(h * 60 * 60))
                .map_err(|_| invalid())
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| invalid())
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
        } else {
            s.parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
        }
    }

    /// Same format for `Option<Duration>`
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match duration {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|s| super::parse_duration(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
