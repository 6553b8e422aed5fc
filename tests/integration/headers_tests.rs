//! Security header integration tests

use axum::http::StatusCode;

use super::common::*;
use secure_headers::config::{Environment, SecureHeadersConfig};
use secure_headers::headers::{
    features, permissions_policy::SELF, IeCompatibilityMode, PermissionsPolicy, ReportTo,
    ReportingEndpoint, ReportingGroup, RobotsDirective, RobotsTag,
};

const DEFAULT_CSP: &str =
    "default-src 'none'; block-all-mixed-content; upgrade-insecure-requests; reflected-xss block";

#[tokio::test]
async fn test_html_page_gets_full_header_set() {
    let response = send(router(SecureHeadersConfig::default()), get_request("/", &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-security-policy").as_deref(), Some(DEFAULT_CSP));
    assert_eq!(header(&response, "x-frame-options").as_deref(), Some("DENY"));
    assert_eq!(header(&response, "frame-options").as_deref(), Some("DENY"));
    assert_eq!(header(&response, "x-xss-protection").as_deref(), Some("1; mode=block"));
    assert_eq!(header(&response, "x-content-type-options").as_deref(), Some("nosniff"));
    assert_eq!(header(&response, "referrer-policy").as_deref(), Some("same-origin"));
    assert_eq!(
        header(&response, "x-permitted-cross-domain-policies").as_deref(),
        Some("none")
    );
}

#[tokio::test]
async fn test_json_response_skips_html_only_headers() {
    let response = send(router(SecureHeadersConfig::default()), get_request("/health", &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_no_header(&response, "content-security-policy");
    assert_no_header(&response, "x-frame-options");
    assert_no_header(&response, "x-xss-protection");
    assert_eq!(header(&response, "x-content-type-options").as_deref(), Some("nosniff"));
    assert_eq!(header(&response, "referrer-policy").as_deref(), Some("same-origin"));
}

#[tokio::test]
async fn test_hsts_only_over_tls() {
    let app = router(SecureHeadersConfig::default());
    let response = send(app.clone(), get_request("/", &[])).await;
    assert_no_header(&response, "strict-transport-security");

    let response = send(app, get_request("https://localhost/", &[])).await;
    assert_eq!(
        header(&response, "strict-transport-security").as_deref(),
        Some("max-age=31536000; includeSubDomains; preload")
    );
}

#[tokio::test]
async fn test_forwarded_proto_needs_trust() {
    let forwarded = [("x-forwarded-proto", "https")];

    let response = send(router(SecureHeadersConfig::default()), get_request("/", &forwarded)).await;
    assert_no_header(&response, "strict-transport-security");

    let mut config = SecureHeadersConfig::default();
    config.headers.trust_forwarded_proto = true;
    let response = send(router(config), get_request("/", &forwarded)).await;
    assert!(header(&response, "strict-transport-security").is_some());
}

#[tokio::test]
async fn test_download_gets_noopen() {
    let response = send(router(SecureHeadersConfig::default()), get_request("/download", &[])).await;

    assert_eq!(header(&response, "x-download-options").as_deref(), Some("noopen"));
    assert_no_header(&response, "content-security-policy");

    let response = send(router(SecureHeadersConfig::default()), get_request("/", &[])).await;
    assert_no_header(&response, "x-download-options");
}

#[tokio::test]
async fn test_frame_page_overrides() {
    let mut config = SecureHeadersConfig::default();
    config.headers.ua_compatible = Some(IeCompatibilityMode::IE11);
    config.headers.permissions_policy = Some(PermissionsPolicy::default().add_self(features::CAMERA));

    let response = send(router(config), get_request("/frame", &[])).await;

    assert_eq!(header(&response, "x-frame-options").as_deref(), Some("SAMEORIGIN"));
    assert_eq!(header(&response, "frame-options").as_deref(), Some("SAMEORIGIN"));
    assert_eq!(header(&response, "x-ua-compatible").as_deref(), Some("IE=Edge"));
    assert_eq!(
        header(&response, "permissions-policy").as_deref(),
        Some("camera=(self), geolocation=(self)")
    );
}

#[tokio::test]
async fn test_configured_permissions_policy_without_overrides() {
    let mut config = SecureHeadersConfig::default();
    config.headers.permissions_policy = Some(
        PermissionsPolicy::default()
            .add_self(features::GEOLOCATION)
            .add(features::GEOLOCATION, "https://maps.example"),
    );

    let response = send(router(config), get_request("/", &[])).await;
    assert_eq!(
        header(&response, "permissions-policy").as_deref(),
        Some(&*format!("geolocation=({} \"https://maps.example\")", SELF))
    );
}

#[tokio::test]
async fn test_development_error_page_relaxes_csp() {
    let mut config = SecureHeadersConfig::default();
    config.environment = Environment::Development;

    let response = send(router(config), get_request("/error", &[])).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let csp = header(&response, "content-security-policy").unwrap();
    assert!(csp.contains("script-src 'unsafe-inline'"), "csp: {}", csp);
    assert!(csp.contains("style-src 'unsafe-inline'"), "csp: {}", csp);
}

#[tokio::test]
async fn test_production_error_page_keeps_csp() {
    let response = send(router(SecureHeadersConfig::default()), get_request("/error", &[])).await;
    assert_eq!(header(&response, "content-security-policy").as_deref(), Some(DEFAULT_CSP));
}

#[tokio::test]
async fn test_optional_headers_from_config() {
    let mut config = SecureHeadersConfig::default();
    config.headers.robots_tag = Some(RobotsTag::restrict(true, true));
    config.headers.report_to = Some(ReportTo(vec![ReportingGroup::new(
        std::time::Duration::from_secs(60),
        vec![ReportingEndpoint::parse("https://reports.example/").unwrap()],
    )]));

    let response = send(router(config), get_request("/health", &[])).await;

    assert_eq!(header(&response, "x-robots-tag").as_deref(), Some("noindex, nofollow"));
    assert_eq!(
        header(&response, "report-to").as_deref(),
        Some(r#"{"max_age":60,"endpoints":["https://reports.example/"]}"#)
    );
}

#[tokio::test]
async fn test_disabled_headers() {
    let mut config = SecureHeadersConfig::default();
    config.headers.enabled = false;

    let response = send(router(config), get_request("/", &[])).await;
    assert_no_header(&response, "content-security-policy");
    assert_no_header(&response, "x-content-type-options");
}

#[tokio::test]
async fn test_headers_over_real_socket() {
    let server = TestServer::spawn().await;

    let response = server.get("/").await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-security-policy")
            .and_then(|v| v.to_str().ok()),
        Some(DEFAULT_CSP)
    );

    let body = response.text().await.unwrap();
    assert!(body.contains("rel=\"noopener\""), "body: {}", body);
    assert!(body.contains("https://example.org/logo.png"), "body: {}", body);
}

#[test]
fn test_robots_directive_is_exported() {
    let tag = RobotsTag {
        directives: [RobotsDirective::NoArchive].into_iter().collect(),
        ..Default::default()
    };
    assert!(tag.directives.contains(&RobotsDirective::NoArchive));
}
