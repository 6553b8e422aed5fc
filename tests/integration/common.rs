//! Common test utilities for integration tests
//!
//! Provides test server spawning, in-process routers and header assertions.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use reqwest::Client;
use tokio::sync::oneshot;
use tower::ServiceExt;

use secure_headers::{
    config::SecureHeadersConfig,
    security::SecurityState,
    server::{create_router, AppState},
};

/// Test server wrapper
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub base_url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawn a test server with default configuration
    pub async fn spawn() -> Self {
        Self::spawn_with_config(SecureHeadersConfig::default()).await
    }

    /// Spawn a test server with custom configuration
    pub async fn spawn_with_config(mut config: SecureHeadersConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        config.server.host = "127.0.0.1".to_string();
        config.server.port = addr.port();

        let app = router(config);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        let base_url = format!("http://{}", addr);

        for _ in 0..50 {
            if client.get(format!("{}/health", base_url)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Self {
            addr,
            client,
            base_url,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Demo router for in-process requests
pub fn router(config: SecureHeadersConfig) -> Router {
    let security = SecurityState::new(&config).unwrap();
    let state = AppState::new(config).unwrap();
    create_router(state, security)
}

/// Run one request through a router
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// GET `path` with a `Host` header, optionally with extra headers
pub fn get_request(path: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(path).header("host", "localhost:8080");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Header value as a string, if present
pub fn header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Assert a header is missing
pub fn assert_no_header(response: &Response, name: &str) {
    assert!(
        response.headers().get(name).is_none(),
        "Expected no '{}' header, got {:?}",
        name,
        response.headers().get(name)
    );
}
