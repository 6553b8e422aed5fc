//! Public-Key-Pins (deprecated, still emitted when configured)

use std::time::Duration;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{SecurityHeader, PUBLIC_KEY_PINS};
use crate::csp::HashAlgorithm;
use crate::error::{HeaderError, HeadersResult};

/// A pinned SPKI fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyPin {
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicKeyPins {
    pub pins: Vec<PublicKeyPin>,
    #[serde(with = "crate::config::humantime_serde")]
    pub max_age: Duration,
    pub include_sub_domains: bool,
    pub report_uri: Option<Url>,
}

impl Default for PublicKeyPins {
    fn default() -> Self {
        Self {
            pins: Vec::new(),
            max_age: Duration::from_secs(365 * 24 * 60 * 60),
            include_sub_domains: true,
            report_uri: None,
        }
    }
}

impl PublicKeyPins {
    pub fn pin(mut self, algorithm: HashAlgorithm, base64_fingerprint: impl Into<String>) -> Self {
        self.pins.push(PublicKeyPin {
            algorithm,
            fingerprint: base64_fingerprint.into(),
        });
        self
    }

    pub fn pin_bytes(self, algorithm: HashAlgorithm, fingerprint: &[u8]) -> Self {
        self.pin(algorithm, BASE64_STANDARD.encode(fingerprint))
    }

    pub fn validate(&self) -> HeadersResult<()> {
        if self.pins.is_empty() {
            return Err(HeaderError::InvalidState(
                "At least one fingerprint has to be pinned".to_string(),
            ));
        }
        if let Some(pin) = self.pins.iter().find(|p| p.fingerprint.is_empty()) {
            return Err(HeaderError::invalid_argument(
                "fingerprint",
                format!("empty {} fingerprint", pin.algorithm),
            ));
        }
        Ok(())
    }
}

impl SecurityHeader for PublicKeyPins {
    const NAME: &'static str = PUBLIC_KEY_PINS;

    fn header_value(&self) -> HeadersResult<String> {
        self.validate()?;

        let mut parts: Vec<String> = self
            .pins
            .iter()
            .map(|pin| format!("pin-{}=\"{}\"", pin.algorithm, pin.fingerprint))
            .collect();
        parts.push(format!("max-age={}", self.max_age.as_secs()));
        if self.include_sub_domains {
            parts.push("includeSubDomains".to_string());
        }
        if let Some(report_uri) = &self.report_uri {
            parts.push(format!("report-uri=\"{}\"", report_uri));
        }
        Ok(parts.join("; "))
    }
}
