//! Security Headers Middleware
//!
//! Adds the configured security headers to HTTP responses. Header values are
//! rendered once when [`SecureHeaders`] is built; per request the middleware
//! only decides which of them apply:
//! - HTML-only headers (CSP, frame options, Permissions-Policy, XSS, UA-Compatible)
//! - HSTS only over TLS
//! - X-Download-Options only for attachments
//! - everything else on every response

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use tracing::debug;

use super::origin::is_tls_request;
use super::overrides::{FrameOptionsOverride, PermissionsPolicyChanges, UaCompatibleOverride};
use crate::config::{Environment, HeadersConfig, SecureHeadersConfig};
use crate::csp::CspOptions;
use crate::error::{HeaderError, HeadersResult};
use crate::headers::{
    self, to_header_value, PermissionsPolicy, SecurityHeader, FRAME_OPTIONS, NOOPEN, NOSNIFF,
};
use crate::telemetry::log_header_error;

/// Static header values
struct StaticHeaders {
    x_content_type_options: HeaderValue,
    x_download_options: HeaderValue,
}

impl StaticHeaders {
    fn new() -> Self {
        Self {
            x_content_type_options: HeaderValue::from_static(NOSNIFF),
            x_download_options: HeaderValue::from_static(NOOPEN),
        }
    }
}

static STATIC_HEADERS: Lazy<StaticHeaders> = Lazy::new(StaticHeaders::new);

fn render<H: SecurityHeader>(header: Option<&H>) -> HeadersResult<Option<HeaderValue>> {
    header.map(to_header_value).transpose()
}

fn csp_value(options: &CspOptions) -> HeadersResult<HeaderValue> {
    let rendered = options.to_string();
    HeaderValue::from_str(&rendered).map_err(|_| {
        HeaderError::Format(format!(
            "'{}' is not a valid {} value",
            rendered,
            headers::CONTENT_SECURITY_POLICY
        ))
    })
}

/// Pre-rendered security headers, shared by every request
#[derive(Debug, Clone)]
pub struct SecureHeaders {
    enabled: bool,
    environment: Environment,
    trust_forwarded_proto: bool,
    csp: Option<(CspOptions, HeaderValue)>,
    hsts: Option<HeaderValue>,
    frame_options: Option<HeaderValue>,
    referrer_policy: Option<HeaderValue>,
    permissions_policy: Option<(PermissionsPolicy, HeaderValue)>,
    xss_protection: Option<HeaderValue>,
    expect_ct: Option<HeaderValue>,
    public_key_pins: Option<HeaderValue>,
    robots_tag: Option<HeaderValue>,
    ua_compatible: Option<HeaderValue>,
    content_type_options: bool,
    download_options: bool,
    cross_domain_policy: Option<HeaderValue>,
    report_to: Option<HeaderValue>,
}

impl SecureHeaders {
    /// Parse and render everything in `config`
    pub fn new(config: &HeadersConfig, environment: Environment) -> HeadersResult<Self> {
        let csp = match config.csp_options()? {
            Some(options) => {
                let value = csp_value(&options)?;
                Some((options, value))
            }
            None => None,
        };

        let permissions_policy = match &config.permissions_policy {
            Some(policy) => Some((policy.clone(), to_header_value(policy)?)),
            None => None,
        };

        Ok(Self {
            enabled: config.enabled,
            environment,
            trust_forwarded_proto: config.trust_forwarded_proto,
            csp,
            hsts: render(config.hsts.as_ref())?,
            frame_options: render(config.frame_options.as_ref())?,
            referrer_policy: render(config.referrer_policy.as_ref())?,
            permissions_policy,
            xss_protection: render(config.xss_protection.as_ref())?,
            expect_ct: render(config.expect_ct.as_ref())?,
            public_key_pins: render(config.public_key_pins.as_ref())?,
            robots_tag: render(config.robots_tag.as_ref())?,
            ua_compatible: render(config.ua_compatible.as_ref())?,
            content_type_options: config.content_type_options,
            download_options: config.download_options,
            cross_domain_policy: render(config.cross_domain_policy.as_ref())?,
            report_to: render(config.report_to.as_ref())?,
        })
    }

    pub fn from_config(config: &SecureHeadersConfig) -> HeadersResult<Self> {
        Self::new(&config.headers, config.environment)
    }

    /// Rendered CSP header value, if a policy is configured
    pub fn csp_header_value(&self) -> Option<&HeaderValue> {
        self.csp.as_ref().map(|(_, value)| value)
    }

    /// Whether the request arrived over TLS
    pub fn is_tls_request(&self, request: &Request) -> bool {
        is_tls_request(request, self.trust_forwarded_proto)
    }

    /// Write the applicable headers into `response`
    pub fn apply(&self, is_tls: bool, response: &mut Response) {
        if !self.enabled {
            return;
        }

        let is_html = header_starts_with(response.headers(), header::CONTENT_TYPE, "text/html");
        let is_attachment =
            header_starts_with(response.headers(), header::CONTENT_DISPOSITION, "attachment");

        if is_html {
            self.apply_html_headers(response);
        }

        let map = response.headers_mut();

        if is_tls {
            insert(map, headers::STRICT_TRANSPORT_SECURITY, &self.hsts);
        }

        if self.content_type_options {
            map.insert(
                header::X_CONTENT_TYPE_OPTIONS,
                STATIC_HEADERS.x_content_type_options.clone(),
            );
        }

        if self.download_options && is_attachment {
            map.insert(
                headers::X_DOWNLOAD_OPTIONS,
                STATIC_HEADERS.x_download_options.clone(),
            );
        }

        insert(map, headers::REFERRER_POLICY, &self.referrer_policy);
        insert(map, headers::EXPECT_CT, &self.expect_ct);
        insert(map, headers::PUBLIC_KEY_PINS, &self.public_key_pins);
        insert(map, headers::X_ROBOTS_TAG, &self.robots_tag);
        insert(
            map,
            headers::X_PERMITTED_CROSS_DOMAIN_POLICIES,
            &self.cross_domain_policy,
        );
        insert(map, headers::REPORT_TO, &self.report_to);
    }

    fn apply_html_headers(&self, response: &mut Response) {
        let csp = self.effective_csp(response.status());
        let frame_options = self.effective_frame_options(response);
        let permissions_policy = self.effective_permissions_policy(response);
        let ua_compatible = self.effective_ua_compatible(response);

        let map = response.headers_mut();
        insert(map, headers::CONTENT_SECURITY_POLICY, &csp);
        if let Some(value) = frame_options {
            map.insert(headers::X_FRAME_OPTIONS, value.clone());
            map.insert(FRAME_OPTIONS, value);
        }
        insert(map, headers::PERMISSIONS_POLICY, &permissions_policy);
        insert(map, headers::X_XSS_PROTECTION, &self.xss_protection);
        insert(map, headers::X_UA_COMPATIBLE, &ua_compatible);
    }

    /// Cached CSP, or a relaxed one for development error pages
    fn effective_csp(&self, status: StatusCode) -> Option<HeaderValue> {
        let (options, cached) = self.csp.as_ref()?;

        if !(self.environment.is_development() && status == StatusCode::INTERNAL_SERVER_ERROR) {
            return Some(cached.clone());
        }

        debug!("Relaxing Content-Security-Policy for developer error page");
        match options.relaxed_for_developer_errors().and_then(|o| csp_value(&o)) {
            Ok(value) => Some(value),
            Err(e) => {
                log_header_error(headers::CONTENT_SECURITY_POLICY, &e);
                Some(cached.clone())
            }
        }
    }

    fn effective_frame_options(&self, response: &Response) -> Option<HeaderValue> {
        let configured = self.frame_options.clone()?;

        match response.extensions().get::<FrameOptionsOverride>() {
            Some(FrameOptionsOverride(policy)) => match to_header_value(policy) {
                Ok(value) => Some(value),
                Err(e) => {
                    log_header_error(headers::X_FRAME_OPTIONS, &e);
                    Some(configured)
                }
            },
            None => Some(configured),
        }
    }

    fn effective_ua_compatible(&self, response: &Response) -> Option<HeaderValue> {
        let configured = self.ua_compatible.clone()?;

        match response.extensions().get::<UaCompatibleOverride>() {
            Some(UaCompatibleOverride(mode)) => to_header_value(mode).ok().or(Some(configured)),
            None => Some(configured),
        }
    }

    fn effective_permissions_policy(&self, response: &Response) -> Option<HeaderValue> {
        let (policy, cached) = self.permissions_policy.as_ref()?;

        let Some(PermissionsPolicyChanges(changes)) = response.extensions().get::<PermissionsPolicyChanges>() else {
            return Some(cached.clone());
        };

        match policy.merge(changes).and_then(|merged| to_header_value(&merged)) {
            Ok(value) => Some(value),
            Err(e) => {
                log_header_error(headers::PERMISSIONS_POLICY, &e);
                Some(cached.clone())
            }
        }
    }
}

fn insert(map: &mut HeaderMap, name: &'static str, value: &Option<HeaderValue>) {
    if let Some(value) = value {
        map.insert(HeaderName::from_static(name), value.clone());
    }
}

fn header_starts_with(map: &HeaderMap, name: HeaderName, prefix: &str) -> bool {
    map.get_all(name).iter().any(|value| {
        value
            .to_str()
            .ok()
            .and_then(|v| v.get(..prefix.len()))
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    })
}

/// Security headers middleware
pub async fn security_headers_middleware(
    State(secure_headers): State<Arc<SecureHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    let is_tls = secure_headers.is_tls_request(&request);
    let mut response = next.run(request).await;

    secure_headers.apply(is_tls, &mut response);
    response
}
