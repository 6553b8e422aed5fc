//! Property-based tests for configuration validation

use std::time::Duration;

use proptest::prelude::*;
use secure_headers::config::SecureHeadersConfig;
use secure_headers::headers::{SecurityHeader, StrictTransportSecurity};

proptest! {
    /// Valid port numbers pass validation
    #[test]
    fn test_valid_port_passes(port in 1u16..=65535) {
        let mut config = SecureHeadersConfig::default();
        config.server.port = port;

        prop_assert!(config.validate().is_ok(), "Port {} should be valid", port);
    }

    /// IPv4 hosts produce a socket address
    #[test]
    fn test_host_string(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
        let mut config = SecureHeadersConfig::default();
        config.server.host = format!("{}.{}.{}.{}", a, b, c, d);

        prop_assert!(config.server.socket_addr().is_ok());
    }

    /// Durations survive a YAML round trip in their `<n>s` form
    #[test]
    fn test_hsts_max_age_round_trip(secs in 0u64..100_000_000) {
        let mut config = SecureHeadersConfig::default();
        config.headers.hsts = Some(StrictTransportSecurity {
            max_age: Duration::from_secs(secs),
            ..Default::default()
        });

        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: SecureHeadersConfig = serde_yaml::from_str(&yaml).unwrap();
        let hsts = loaded.headers.hsts.unwrap();

        prop_assert_eq!(hsts.max_age, Duration::from_secs(secs));
        let expected_prefix = format!("max-age={}", secs);
        prop_assert!(hsts.header_value().unwrap().starts_with(&expected_prefix));
    }

    /// Any CSP the parser accepts is accepted by config validation
    #[test]
    fn test_csp_validation_matches_parser(raw in "(default|img|script)-src( 'self'| 'none'| data:){0,3}") {
        let mut config = SecureHeadersConfig::default();
        config.headers.content_security_policy = Some(raw.clone());

        let parsed = secure_headers::csp::parse_policy(&raw);
        prop_assert_eq!(config.validate().is_ok(), parsed.is_ok());
    }
}
