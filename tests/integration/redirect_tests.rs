//! Redirect filter integration tests

use axum::http::StatusCode;
use url::Url;

use super::common::*;
use secure_headers::config::{RedirectConfig, SecureHeadersConfig};

fn filtered_config(allowed_bases: &[&str]) -> SecureHeadersConfig {
    SecureHeadersConfig {
        redirect: RedirectConfig {
            enabled: true,
            allowed_bases: allowed_bases.iter().map(|b| Url::parse(b).unwrap()).collect(),
        },
        ..Default::default()
    }
}

async fn redirect_to(config: SecureHeadersConfig, location: &str) -> axum::response::Response {
    let path = format!("/redirect?to={}", urlencode(location));
    send(router(config), get_request(&path, &[])).await
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[tokio::test]
async fn test_relative_redirect_passes() {
    let response = redirect_to(filtered_config(&[]), "/account").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, "location").as_deref(), Some("/account"));
}

#[tokio::test]
async fn test_same_host_redirect_passes() {
    let response = redirect_to(filtered_config(&[]), "http://localhost:8080/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_foreign_redirect_is_blocked() {
    let response = redirect_to(filtered_config(&[]), "https://evil.example/phish").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_no_header(&response, "location");
    // the replacement response still goes through the header middleware
    assert_eq!(header(&response, "x-content-type-options").as_deref(), Some("nosniff"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["type"], "redirect_blocked");
}

#[tokio::test]
async fn test_scheme_relative_foreign_redirect_is_blocked() {
    let response = redirect_to(filtered_config(&[]), "//evil.example/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_backslash_foreign_redirect_is_blocked() {
    for location in ["/\\evil.example/", "\\\\evil.example"] {
        let response = redirect_to(filtered_config(&[]), location).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "location: {}", location);
    }
}

#[tokio::test]
async fn test_allowed_base_passes() {
    let config = filtered_config(&["https://login.example/oauth/"]);

    let response = redirect_to(config.clone(), "https://login.example/oauth/authorize?x=1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = redirect_to(config, "https://login.example/admin").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_filter_disabled_by_default() {
    let response = redirect_to(SecureHeadersConfig::default(), "https://evil.example/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_blocked_over_real_socket() {
    let server = TestServer::spawn_with_config(filtered_config(&[])).await;

    let response = server
        .get(&format!("/redirect?to={}", urlencode("https://evil.example/")))
        .await;
    assert_eq!(response.status().as_u16(), 500);

    let response = server.get("/redirect?to=%2Fhealth").await;
    assert_eq!(response.status().as_u16(), 303);
}
