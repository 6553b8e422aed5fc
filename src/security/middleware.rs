//! Security middleware stack
//!
//! Combines the header writer and the redirect filter with the right
//! ordering for a router.

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};

use crate::config::SecureHeadersConfig;
use crate::error::HeadersResult;

use super::{
    headers::{security_headers_middleware, SecureHeaders},
    redirect::{redirect_filter_middleware, RedirectPolicy},
};

/// Security state containing everything the middleware needs
#[derive(Debug, Clone)]
pub struct SecurityState {
    pub secure_headers: Arc<SecureHeaders>,
    /// `None` when the redirect filter is disabled
    pub redirect: Option<Arc<RedirectPolicy>>,
}

impl SecurityState {
    /// Create security state from configuration
    pub fn new(config: &SecureHeadersConfig) -> HeadersResult<Self> {
        let secure_headers = SecureHeaders::from_config(config)?;
        let redirect = config.redirect.enabled.then(|| {
            Arc::new(RedirectPolicy::from_config(
                &config.redirect,
                config.headers.trust_forwarded_proto,
            ))
        });

        Ok(Self {
            secure_headers: Arc::new(secure_headers),
            redirect,
        })
    }

    /// State for the secure production defaults
    pub fn production() -> HeadersResult<Self> {
        Self::new(&SecureHeadersConfig::production())
    }
}

/// Apply security middleware to a router
///
/// The header writer is outermost so that responses produced by the
/// redirect filter get security headers too.
pub fn apply_security_middleware<S>(router: Router<S>, security: SecurityState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = match security.redirect {
        Some(policy) => router.layer(axum_middleware::from_fn_with_state(
            policy,
            redirect_filter_middleware,
        )),
        None => router,
    };

    router.layer(axum_middleware::from_fn_with_state(
        security.secure_headers,
        security_headers_middleware,
    ))
}
