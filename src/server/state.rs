//! Server state management

use std::sync::Arc;
use std::time::Instant;

use crate::config::SecureHeadersConfig;
use crate::error::HeadersResult;
use crate::html::{HttpFetcher, IntegrityResolver};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SecureHeadersConfig>,
    pub integrity: Arc<IntegrityResolver<HttpFetcher>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: SecureHeadersConfig) -> HeadersResult<Self> {
        Ok(Self {
            config: Arc::new(config),
            integrity: Arc::new(IntegrityResolver::new(HttpFetcher::new()?)),
            started_at: Instant::now(),
        })
    }
}
