//! Error types for the HTTP server.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Page generation failed with the provider's reason.
    #[error("Failed to generate page: {0}")]
    GenerationFailed(String),

    /// Page store could not be read.
    #[error("Page store unavailable")]
    StoreUnavailable,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::GenerationFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.to_string(),
            )
                .into_response(),
            Self::StoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({"error": self.to_string()})),
            )
                .into_response(),
        }
    }
}
