//! Subresource integrity for cross-origin scripts and stylesheets

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use super::{absolute_reference, url_authority, RequestOrigin, TagAttributes};
use crate::csp::HashAlgorithm;
use crate::error::{HeaderError, HeadersResult};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads subresources so they can be hashed
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> HeadersResult<Bytes>;
}

/// [`ResourceFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> HeadersResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("secure-headers/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| HeaderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> HeadersResult<Bytes> {
        let fetch_error = |e: reqwest::Error| HeaderError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        self.http
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)
    }
}

/// Adds `integrity` to `<script src>` and `<link rel=stylesheet href>` tags
///
/// Each URL is downloaded at most once while it keeps succeeding; failed
/// downloads are not cached.
pub struct IntegrityResolver<F> {
    fetcher: F,
    algorithm: HashAlgorithm,
    cache: DashMap<String, String>,
}

impl<F: ResourceFetcher> IntegrityResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            algorithm: HashAlgorithm::Sha256,
            cache: DashMap::new(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn cached(&self, url: &str) -> Option<String> {
        self.cache.get(url).map(|entry| entry.value().clone())
    }

    /// `<algo>-<base64>` digest of the resource, fetched on first use
    pub async fn integrity_for(&self, url: &Url) -> HeadersResult<String> {
        if let Some(value) = self.cached(url.as_str()) {
            return Ok(value);
        }

        let body = self.fetcher.fetch(url).await?;
        let value = self.algorithm.integrity_value(&body);
        debug!(url = %url, bytes = body.len(), "Computed subresource integrity");

        self.cache.insert(url.to_string(), value.clone());
        Ok(value)
    }

    /// Rewrite `tag` in place; returns whether attributes were added
    pub async fn apply(&self, tag: &mut TagAttributes, origin: &RequestOrigin) -> bool {
        if tag.contains("integrity") {
            return false;
        }

        let Some(url) = resource_url(tag, origin) else {
            return false;
        };

        match self.integrity_for(&url).await {
            Ok(integrity) => {
                tag.set("integrity", integrity);
                tag.set("crossorigin", "anonymous");
                true
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Could not compute subresource integrity");
                false
            }
        }
    }
}

/// Cross-origin absolute URL referenced by a script or stylesheet tag
fn resource_url(tag: &TagAttributes, origin: &RequestOrigin) -> Option<Url> {
    let reference = match tag.tag() {
        "script" => tag.get("src")?,
        "link" if tag
            .get("rel")
            .map(|rel| rel.eq_ignore_ascii_case("stylesheet"))
            .unwrap_or(false) =>
        {
            tag.get("href")?
        }
        _ => return None,
    };

    let absolute = absolute_reference(reference, origin)?;
    let url = Url::parse(&absolute).ok()?;

    let same_origin = url.scheme() == origin.scheme()
        && url_authority(&url)
            .map(|authority| authority.eq_ignore_ascii_case(origin.authority()))
            .unwrap_or(false);

    (!same_origin).then_some(url)
}
