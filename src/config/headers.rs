//! Which security headers to send, and with what values

use serde::{Deserialize, Serialize};

use crate::csp::{CspOptions, CspParser, PolicyParser};
use crate::error::{HeaderError, HeadersResult};
use crate::headers::{
    ExpectCt, FrameOptionsPolicy, IeCompatibilityMode, PermissionsPolicy,
    PermittedCrossDomainPolicy, PublicKeyPins, ReferrerPolicy, ReportTo, RobotsTag,
    StrictTransportSecurity, XssProtection,
};

/// Security header settings
///
/// A `None` header is not sent at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    /// Master switch for the header middleware
    pub enabled: bool,
    /// Raw Content-Security-Policy, parsed and re-serialized at startup
    pub content_security_policy: Option<String>,
    pub hsts: Option<StrictTransportSecurity>,
    pub frame_options: Option<FrameOptionsPolicy>,
    pub referrer_policy: Option<ReferrerPolicy>,
    pub permissions_policy: Option<PermissionsPolicy>,
    pub xss_protection: Option<XssProtection>,
    pub expect_ct: Option<ExpectCt>,
    pub public_key_pins: Option<PublicKeyPins>,
    pub robots_tag: Option<RobotsTag>,
    pub ua_compatible: Option<IeCompatibilityMode>,
    /// X-Content-Type-Options: nosniff
    pub content_type_options: bool,
    /// X-Download-Options: noopen on attachments
    pub download_options: bool,
    pub cross_domain_policy: Option<PermittedCrossDomainPolicy>,
    pub report_to: Option<ReportTo>,
    /// Treat `X-Forwarded-Proto: https` as a TLS request (behind a proxy)
    pub trust_forwarded_proto: bool,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_security_policy: Some(CspOptions::default().to_string()),
            hsts: Some(StrictTransportSecurity::default()),
            frame_options: Some(FrameOptionsPolicy::Deny),
            referrer_policy: Some(ReferrerPolicy::default()),
            permissions_policy: None,
            xss_protection: Some(XssProtection::default()),
            expect_ct: None,
            public_key_pins: None,
            robots_tag: None,
            ua_compatible: None,
            content_type_options: true,
            download_options: true,
            cross_domain_policy: Some(PermittedCrossDomainPolicy::None),
            report_to: None,
            trust_forwarded_proto: false,
        }
    }
}

impl HeadersConfig {
    /// Parsed Content-Security-Policy, if one is configured
    pub fn csp_options(&self) -> HeadersResult<Option<CspOptions>> {
        self.csp_options_with(&PolicyParser)
    }

    pub fn csp_options_with<P: CspParser>(&self, parser: &P) -> HeadersResult<Option<CspOptions>> {
        self.content_security_policy
            .as_deref()
            .map(|raw| parser.parse_policy(raw))
            .transpose()
    }

    pub fn validate(&self) -> HeadersResult<()> {
        self.csp_options().map_err(|e| {
            HeaderError::Config(format!("headers.content_security_policy: {}", e))
        })?;

        if let Some(pins) = &self.public_key_pins {
            pins.validate()
                .map_err(|e| HeaderError::Config(format!("headers.public_key_pins: {}", e)))?;
        }

        if let Some(report_to) = &self.report_to {
            report_to
                .validate()
                .map_err(|e| HeaderError::Config(format!("headers.report_to: {}", e)))?;
        }

        Ok(())
    }
}
