//! Redirect filter
//!
//! Inspects `Location` headers on the way out and replaces the response with
//! an error when a redirect would leave the current host for somewhere not
//! explicitly allowed.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;
use url::Url;

use super::origin::{is_tls_request, RequestOrigin};
use crate::config::RedirectConfig;
use crate::error::HeaderError;

/// Allow-list of redirect targets
#[derive(Debug, Clone, Default)]
pub struct RedirectPolicy {
    allowed_bases: Vec<Url>,
    trust_forwarded_proto: bool,
}

impl RedirectPolicy {
    pub fn new(allowed_bases: Vec<Url>) -> Self {
        Self {
            allowed_bases,
            trust_forwarded_proto: false,
        }
    }

    pub fn from_config(config: &RedirectConfig, trust_forwarded_proto: bool) -> Self {
        Self {
            allowed_bases: config.allowed_bases.clone(),
            trust_forwarded_proto,
        }
    }

    pub fn allowed_bases(&self) -> &[Url] {
        &self.allowed_bases
    }

    /// Whether `location` is a safe redirect target for a request to `origin`
    ///
    /// The location is resolved against the request URL the way a browser
    /// would, so relative, scheme-relative and backslash forms are judged by
    /// the host they actually reach.
    pub fn is_allowed(&self, origin: &RequestOrigin, location: &str) -> bool {
        let Ok(request_url) = origin.to_url() else {
            return false;
        };
        let Ok(target) = request_url.join(location) else {
            return false;
        };

        let same_host = target.host_str().is_some() && target.host_str() == request_url.host_str();
        let same_port_or_upgrade = match (request_url.port_or_known_default(), target.port_or_known_default()) {
            (Some(request_port), Some(target_port)) => {
                request_port == target_port || (request_port == 80 && target_port == 443)
            }
            _ => false,
        };

        (same_host && same_port_or_upgrade)
            || self.allowed_bases.iter().any(|base| is_base_of(base, &target))
    }

    fn is_tls(&self, request: &Request) -> bool {
        is_tls_request(request, self.trust_forwarded_proto)
    }
}

/// `base` is a base of `target` when origins match and the target path lies
/// under the base path's last `/`
fn is_base_of(base: &Url, target: &Url) -> bool {
    if base.scheme() != target.scheme()
        || base.host_str() != target.host_str()
        || base.port_or_known_default() != target.port_or_known_default()
    {
        return false;
    }

    let base_path = base.path();
    let prefix = match base_path.rfind('/') {
        Some(index) => &base_path[..=index],
        None => "/",
    };
    target.path().starts_with(prefix)
}

/// Redirect filter middleware
pub async fn redirect_filter_middleware(
    State(policy): State<Arc<RedirectPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = RequestOrigin::from_request(&request, policy.is_tls(&request));
    let response = next.run(request).await;

    for value in response.headers().get_all(header::LOCATION) {
        let location = String::from_utf8_lossy(value.as_bytes()).into_owned();
        let allowed = value.to_str().is_ok() && policy.is_allowed(&origin, &location);

        if !allowed {
            warn!(
                location = %location,
                origin = %origin,
                "Blocked a potentially dangerous redirect"
            );
            return HeaderError::RedirectBlocked(location).into_response();
        }
    }

    response
}
