//! Typed security response headers
//!
//! Every header is a plain value type that renders its wire string once,
//! through [`SecurityHeader::header_value`]. The middleware in
//! [`crate::security`] caches the rendered [`HeaderValue`]s at startup.

pub mod cross_domain;
pub mod expect_ct;
pub mod frame_options;
pub mod hsts;
pub mod permissions_policy;
pub mod public_key_pins;
pub mod referrer_policy;
pub mod report_to;
pub mod robots_tag;
pub mod ua_compatible;
pub mod xss_protection;

pub use cross_domain::PermittedCrossDomainPolicy;
pub use expect_ct::ExpectCt;
pub use frame_options::FrameOptionsPolicy;
pub use hsts::StrictTransportSecurity;
pub use permissions_policy::{features, PermissionsPolicy, PermissionsPolicyChange};
pub use public_key_pins::{PublicKeyPin, PublicKeyPins};
pub use referrer_policy::ReferrerPolicy;
pub use report_to::{ReportTo, ReportingEndpoint, ReportingGroup};
pub use robots_tag::{ImagePreviewSize, RobotsDirective, RobotsTag};
pub use ua_compatible::IeCompatibilityMode;
pub use xss_protection::XssProtection;

use axum::http::HeaderValue;

use crate::error::{HeaderError, HeadersResult};

pub const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
pub const STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
pub const X_FRAME_OPTIONS: &str = "x-frame-options";
pub const FRAME_OPTIONS: &str = "frame-options";
pub const REFERRER_POLICY: &str = "referrer-policy";
pub const PERMISSIONS_POLICY: &str = "permissions-policy";
pub const X_XSS_PROTECTION: &str = "x-xss-protection";
pub const EXPECT_CT: &str = "expect-ct";
pub const PUBLIC_KEY_PINS: &str = "public-key-pins";
pub const X_ROBOTS_TAG: &str = "x-robots-tag";
pub const X_UA_COMPATIBLE: &str = "x-ua-compatible";
pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
pub const X_DOWNLOAD_OPTIONS: &str = "x-download-options";
pub const X_PERMITTED_CROSS_DOMAIN_POLICIES: &str = "x-permitted-cross-domain-policies";
pub const REPORT_TO: &str = "report-to";

/// `X-Content-Type-Options` has a single meaningful value
pub const NOSNIFF: &str = "nosniff";

/// `X-Download-Options` value for attachments
pub const NOOPEN: &str = "noopen";

/// A response header with a typed value
pub trait SecurityHeader {
    /// Lowercase header name
    const NAME: &'static str;

    fn header_value(&self) -> HeadersResult<String>;
}

/// Render a header into a value ready for insertion
pub fn to_header_value<H: SecurityHeader>(header: &H) -> HeadersResult<HeaderValue> {
    let rendered = header.header_value()?;
    HeaderValue::from_str(&rendered).map_err(|_| {
        HeaderError::Format(format!(
            "'{}' is not a valid {} header value",
            rendered,
            H::NAME
        ))
    })
}
