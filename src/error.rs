//! Error types for the product gateway

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for the product gateway
pub type Result<T> = std::result::Result<T, Error>;

/// Product gateway errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream returned a non-success status
    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code from the upstream API
        status: u16,
        /// Upstream response body, truncated
        body: String,
    },

    /// Upstream transport failure (connect, timeout, TLS)
    #[error("Upstream unavailable: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Malformed upstream payload
    #[error("Malformed upstream payload: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short label for the JSON error body, mirrored from the variant
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration error",
            Self::UpstreamStatus { .. } | Self::Upstream(_) => "Failed to fetch from upstream",
            Self::Json(_) => "Malformed upstream response",
            Self::Io(_) => "IO error",
            Self::Internal(_) => "Internal server error",
        }
    }
}

/// All per-request failures surface as a JSON error response. Upstream
/// and serialization failures are propagated untouched in `message` —
/// never masked with stale or synthetic data.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.label(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UpstreamStatus {
            status: 503,
            body: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned 503: Service Unavailable");
        assert_eq!(err.label(), "Failed to fetch from upstream");
    }

    #[test]
    fn test_json_error_label() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = Error::from(err);
        assert_eq!(err.label(), "Malformed upstream response");
    }
}
