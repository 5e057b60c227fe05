//! Per-request error taxonomy and its HTTP mapping.
//!
//! Every failure is converted at the point of detection into a terminal
//! response for that request; nothing is retried or escalated. The client
//! sees a short plain-text body, the full cause goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure kinds for a single relayed request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Path does not match `/proxy/{name}/{remainder}`.
    #[error("invalid path format, use /proxy/{{api-name}}/...")]
    MalformedPath,

    /// Backend name is not in the registry.
    #[error("unsupported API: {0}")]
    UnknownBackend(String),

    /// The target URL could not be formed.
    #[error("failed to construct target URL: {0}")]
    UrlConstruction(#[from] url::ParseError),

    /// The outbound request could not be built.
    #[error("failed to build upstream request: {0}")]
    RequestConstruction(String),

    /// Network-level failure contacting the backend (DNS, refused, TLS,
    /// timeout, reset).
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProxyError {
    /// Client-visible status code for this failure kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MalformedPath | ProxyError::UnknownBackend(_) => StatusCode::BAD_REQUEST,
            ProxyError::UrlConstruction(_) | ProxyError::RequestConstruction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
