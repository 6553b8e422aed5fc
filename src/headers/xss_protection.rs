//! X-XSS-Protection (legacy)

use serde::{Deserialize, Serialize};
use url::Url;

use super::{SecurityHeader, X_XSS_PROTECTION};
use crate::error::HeadersResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XssProtection {
    pub enabled: bool,
    pub block: bool,
    pub report_uri: Option<Url>,
}

impl Default for XssProtection {
    fn default() -> Self {
        Self {
            enabled: true,
            block: true,
            report_uri: None,
        }
    }
}

impl SecurityHeader for XssProtection {
    const NAME: &'static str = X_XSS_PROTECTION;

    fn header_value(&self) -> HeadersResult<String> {
        if !self.enabled {
            return Ok("0".to_string());
        }

        let mut value = String::from("1");
        if self.block {
            value.push_str("; mode=block");
        }
        if let Some(report_uri) = &self.report_uri {
            value.push_str("; report=");
            value.push_str(report_uri.as_str());
        }
        Ok(value)
    }
}
