//! Error types for vibesync-proxy
//!
//! Every failure leaving a handler becomes a flat `{"error": "..."}` body.
//! Upstream detail is logged where the failure happens and never reaches
//! the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use vibesync_common::api::ErrorBody;

/// API error type
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Caller input error (400)
    #[error("Invalid request: {0}")]
    BadRequest(&'static str),

    /// Missing credential or other server configuration problem (500)
    #[error("Misconfigured: {0}")]
    Misconfigured(&'static str),

    /// Upstream provider failed (500)
    #[error("Upstream failure: {0}")]
    Upstream(&'static str),

    /// Request body over the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(&'static str),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Misconfigured(_) | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response body
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::BadRequest(msg)
            | ProxyError::PayloadTooLarge(msg)
            | ProxyError::Misconfigured(msg)
            | ProxyError::Upstream(msg) => *msg,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody::new(self.public_message()));
        (self.status(), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::BadRequest("Missing coordinates").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::Misconfigured("Missing API Key").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::Upstream("Analysis failed").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::PayloadTooLarge("Image too large").status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
