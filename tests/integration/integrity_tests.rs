//! Subresource integrity tests against a mock CDN

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::*;
use secure_headers::config::SecureHeadersConfig;
use secure_headers::csp::HashAlgorithm;
use secure_headers::html::{HttpFetcher, IntegrityResolver, RequestOrigin, TagAttributes};

const SCRIPT: &str = "console.log('hello');";

async fn cdn() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCRIPT))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

fn page_origin() -> RequestOrigin {
    RequestOrigin::new("https", "www.example")
}

#[tokio::test]
async fn test_script_tag_gets_integrity_once() {
    let cdn = cdn().await;
    let resolver = IntegrityResolver::new(HttpFetcher::new().unwrap());
    let src = format!("{}/app.js", cdn.uri());
    let expected = HashAlgorithm::Sha256.integrity_value(SCRIPT.as_bytes());

    for _ in 0..3 {
        let mut tag = TagAttributes::new("script").with("src", src.clone());
        assert!(resolver.apply(&mut tag, &page_origin()).await);
        assert_eq!(tag.get("integrity"), Some(expected.as_str()));
        assert_eq!(tag.get("crossorigin"), Some("anonymous"));
    }
    // `expect(1)` is verified when the mock server drops
}

#[tokio::test]
async fn test_failed_fetch_leaves_tag() {
    let cdn = cdn().await;
    let resolver = IntegrityResolver::new(HttpFetcher::new().unwrap());

    let mut tag = TagAttributes::new("link")
        .with("rel", "stylesheet")
        .with("href", format!("{}/missing.js", cdn.uri()));
    assert!(!resolver.apply(&mut tag, &page_origin()).await);
    assert!(!tag.contains("integrity"));
    assert!(!tag.contains("crossorigin"));
}

#[tokio::test]
async fn test_integrity_endpoint() {
    let cdn = cdn().await;
    let app = router(SecureHeadersConfig::default());

    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", &format!("{}/app.js", cdn.uri()))
        .finish();
    let response = send(app, get_request(&format!("/integrity?{}", query), &[])).await;
    assert_eq!(response.status().as_u16(), 200);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json["integrity"],
        HashAlgorithm::Sha256.integrity_value(SCRIPT.as_bytes())
    );
}

#[tokio::test]
async fn test_integrity_endpoint_reports_fetch_errors() {
    let cdn = cdn().await;
    let app = router(SecureHeadersConfig::default());

    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", &format!("{}/missing.js", cdn.uri()))
        .finish();
    let response = send(app, get_request(&format!("/integrity?{}", query), &[])).await;
    assert_eq!(response.status().as_u16(), 502);
}
