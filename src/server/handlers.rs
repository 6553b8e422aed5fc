//! Request handlers for the demo server

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use url::Url;

use super::state::AppState;
use crate::error::HeadersResult;
use crate::headers::permissions_policy::SELF;
use crate::headers::{features, FrameOptionsPolicy, IeCompatibilityMode};
use crate::html::{apply_noopener, upgrade_insecure_resources, RequestOrigin, TagAttributes};
use crate::security::{FrameOptionsOverride, PermissionsPolicyChanges, UaCompatibleOverride};

fn request_origin(state: &AppState, request: &Request) -> RequestOrigin {
    let forwarded_tls = state.config.headers.trust_forwarded_proto
        && request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false);
    RequestOrigin::from_request(request, forwarded_tls)
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body><h1>{title}</h1>{body}</body></html>\n"
    ))
}

/// GET /
pub async fn root(State(state): State<AppState>, request: Request) -> Html<String> {
    let origin = request_origin(&state, &request);

    let mut tags = vec![
        TagAttributes::new("a")
            .with("href", "https://owasp.org/www-project-secure-headers/")
            .with("target", "_blank"),
        TagAttributes::new("a").with("href", "/frame").with("target", "_blank"),
        TagAttributes::new("img")
            .with("src", "http://example.org/logo.png")
            .with("alt", "logo"),
    ];

    for tag in &mut tags {
        upgrade_insecure_resources(tag);
        apply_noopener(tag, &origin);
    }

    let items: String = tags
        .iter()
        .map(|tag| format!("<li>{}{}</li>", tag, closing(tag.tag())))
        .collect();
    page("secure-headers", &format!("<ul>{}</ul>", items))
}

fn closing(tag: &str) -> &'static str {
    match tag {
        "a" => "link</a>",
        _ => "",
    }
}

/// GET /frame
///
/// Embeddable from the same origin, with geolocation allowed for itself
pub async fn frame() -> impl IntoResponse {
    (
        FrameOptionsOverride(FrameOptionsPolicy::SameOrigin),
        UaCompatibleOverride(IeCompatibilityMode::Edge),
        PermissionsPolicyChanges::default().allow(features::GEOLOCATION, SELF),
        page("Frame", "<p>This page may be framed by its own origin.</p>"),
    )
}

/// GET /download
pub async fn download() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"report.txt\""),
        ],
        "report\n",
    )
}

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub to: String,
}

/// GET /redirect?to=<location>
pub async fn redirect(Query(query): Query<RedirectQuery>) -> Redirect {
    Redirect::to(&query.to)
}

/// GET /error
pub async fn error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        page("Error", "<p>Something went wrong.</p>"),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct IntegrityQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct IntegrityResponse {
    pub url: String,
    pub integrity: String,
}

/// GET /integrity?url=<absolute url>
pub async fn integrity(
    State(state): State<AppState>,
    Query(query): Query<IntegrityQuery>,
) -> HeadersResult<Json<IntegrityResponse>> {
    let url = Url::parse(&query.url)?;
    let integrity = state.integrity.integrity_for(&url).await?;

    Ok(Json(IntegrityResponse {
        url: url.to_string(),
        integrity,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub csp_enabled: bool,
    pub redirect_filter: bool,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        environment: format!("{:?}", state.config.environment).to_lowercase(),
        csp_enabled: state.config.headers.content_security_policy.is_some(),
        redirect_filter: state.config.redirect.enabled,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
