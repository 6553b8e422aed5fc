//! X-Frame-Options / Frame-Options

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{SecurityHeader, X_FRAME_OPTIONS};
use crate::error::HeadersResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameOptionsPolicy {
    #[default]
    Deny,
    SameOrigin,
    /// Obsolete in every current browser, kept for legacy clients
    AllowFrom(Url),
}

impl fmt::Display for FrameOptionsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deny => f.write_str("DENY"),
            Self::SameOrigin => f.write_str("SAMEORIGIN"),
            Self::AllowFrom(url) => write!(f, "ALLOW-FROM {}", url),
        }
    }
}

impl SecurityHeader for FrameOptionsPolicy {
    const NAME: &'static str = X_FRAME_OPTIONS;

    fn header_value(&self) -> HeadersResult<String> {
        Ok(self.to_string())
    }
}
