//! The scheme and authority a request was addressed to

use std::fmt;

use axum::extract::Request;
use axum::http::header;
use url::Url;

use crate::error::{HeaderError, HeadersResult};

/// Scheme plus `host[:port]` of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    scheme: String,
    authority: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            authority: authority.into(),
        }
    }

    /// `https://example.org:8443` style origin
    pub fn parse(origin: &str) -> HeadersResult<Self> {
        let url = Url::parse(origin)?;
        let host = url
            .host_str()
            .ok_or_else(|| HeaderError::Format(format!("'{}' has no host", origin)))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self::new(url.scheme(), authority))
    }

    /// Origin of an inbound request
    ///
    /// Uses the absolute request URI when present, otherwise the `Host`
    /// header. `is_tls` picks the scheme for origin-form requests.
    pub fn from_request(request: &Request, is_tls: bool) -> Self {
        let uri = request.uri();
        let scheme = uri
            .scheme_str()
            .unwrap_or(if is_tls { "https" } else { "http" });
        let authority = uri
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                request
                    .headers()
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "localhost".to_string());

        Self::new(scheme, authority)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn to_url(&self) -> HeadersResult<Url> {
        Ok(Url::parse(&format!("{}://{}/", self.scheme, self.authority))?)
    }

    /// Host without the port, lowercased
    pub fn host(&self) -> HeadersResult<String> {
        self.to_url()?
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| HeaderError::Format(format!("'{}' has no host", self)))
    }

    /// Resolve a scheme-relative `//host/path` reference against this origin
    pub fn resolve_scheme_relative(&self, reference: &str) -> Option<String> {
        reference
            .starts_with("//")
            .then(|| format!("{}:{}", self.scheme, reference))
    }
}

/// Whether a request arrived over TLS
///
/// With `trust_forwarded_proto`, the first `X-Forwarded-Proto` entry set by
/// the closest proxy decides.
pub fn is_tls_request(request: &Request, trust_forwarded_proto: bool) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }
    trust_forwarded_proto
        && request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false)
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
