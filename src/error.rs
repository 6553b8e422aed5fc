//! Error types for secure-headers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for header operations
pub type HeadersResult<T> = Result<T, HeaderError>;

/// Main error type for header construction, CSP parsing and the middleware
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// A required argument was missing or unusable
    #[error("Invalid argument `{param}`: {message}")]
    InvalidArgument {
        param: &'static str,
        message: String,
    },

    /// A mutation would break a value's invariant (e.g. `'none'` exclusivity)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed input text, such as an unparsable report URI
    #[error("Format error: {0}")]
    Format(String),

    /// A value has no textual mapping
    #[error("Not supported: {0}")]
    NotSupported(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Redirect filter
    #[error("A potentially dangerous redirect was prevented to '{0}'")]
    RedirectBlocked(String),

    // Subresource integrity
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },
}

impl HeaderError {
    pub fn invalid_argument(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } | Self::Format(_) => StatusCode::BAD_REQUEST,
            Self::InvalidState(_)
            | Self::NotSupported(_)
            | Self::Config(_)
            | Self::RedirectBlocked(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Fetch { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_type(&self) -> &str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::InvalidState(_) => "invalid_state",
            Self::Format(_) => "format_error",
            Self::NotSupported(_) => "not_supported",
            Self::Config(_) => "configuration_error",
            Self::RedirectBlocked(_) => "redirect_blocked",
            Self::Fetch { .. } => "fetch_error",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.error_type(), &self.to_string());

        if let Self::InvalidArgument { param, .. } = self {
            return response.with_param(param);
        }

        response
    }
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: ErrorDetail {
                message: message.to_string(),
                error_type: error_type.to_string(),
                param: None,
            },
        }
    }

    pub fn with_param(mut self, param: &str) -> Self {
        self.error.param = Some(param.to_string());
        self
    }
}

impl IntoResponse for HeaderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_error_response());

        (status, body).into_response()
    }
}

impl From<std::io::Error> for HeaderError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<url::ParseError> for HeaderError {
    fn from(err: url::ParseError) -> Self {
        Self::Format(err.to_string())
    }
}
