//! Strict-Transport-Security

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{SecurityHeader, STRICT_TRANSPORT_SECURITY};
use crate::error::HeadersResult;

/// HSTS policy, only ever sent over TLS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrictTransportSecurity {
    #[serde(with = "crate::config::humantime_serde")]
    pub max_age: Duration,
    pub include_sub_domains: bool,
    pub preload: bool,
}

impl Default for StrictTransportSecurity {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(365 * 24 * 60 * 60),
            include_sub_domains: true,
            preload: true,
        }
    }
}

impl SecurityHeader for StrictTransportSecurity {
    const NAME: &'static str = STRICT_TRANSPORT_SECURITY;

    fn header_value(&self) -> HeadersResult<String> {
        let mut value = format!("max-age={}", self.max_age.as_secs());
        if self.include_sub_domains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        Ok(value)
    }
}
