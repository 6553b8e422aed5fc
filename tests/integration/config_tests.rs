//! Configuration loading tests

use std::io::Write;

use assert_matches::assert_matches;

use super::common::*;
use secure_headers::config::{Environment, SecureHeadersConfig};
use secure_headers::HeaderError;

fn write_config(extension: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_yaml_config_drives_headers() {
    let file = write_config(
        ".yaml",
        r#"
environment: development
headers:
  content_security_policy: "default-src 'self'; img-src data:"
  frame_options: same-origin
  referrer_policy: no-referrer
  hsts:
    max_age: 60s
    include_sub_domains: false
    preload: false
"#,
    );

    let config = SecureHeadersConfig::from_file(file.path()).unwrap();
    assert_eq!(config.environment, Environment::Development);

    let response = send(router(config), get_request("https://localhost/", &[])).await;
    assert_eq!(
        header(&response, "content-security-policy").as_deref(),
        Some("default-src 'self'; img-src data:")
    );
    assert_eq!(header(&response, "x-frame-options").as_deref(), Some("SAMEORIGIN"));
    assert_eq!(header(&response, "referrer-policy").as_deref(), Some("no-referrer"));
    assert_eq!(header(&response, "strict-transport-security").as_deref(), Some("max-age=60"));
}

#[test]
fn test_invalid_csp_in_config_is_rejected() {
    let file = write_config(
        ".toml",
        r#"
[headers]
content_security_policy = "default-src 'none' 'self'"
"#,
    );

    assert_matches!(
        SecureHeadersConfig::from_file(file.path()),
        Err(HeaderError::Config(message)) if message.contains("content_security_policy")
    );
}

#[test]
fn test_saved_config_loads_back() {
    let original = SecureHeadersConfig::production();
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::fs::write(file.path(), original.to_string_for_path(file.path()).unwrap()).unwrap();

    let loaded = SecureHeadersConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded.environment, Environment::Production);
    assert_eq!(
        loaded.headers.content_security_policy,
        original.headers.content_security_policy
    );
    assert!(loaded.headers.trust_forwarded_proto);
}
