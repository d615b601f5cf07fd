//! Error types for the Landmark axum integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Rejection returned by the [`Landmark`](crate::Landmark) extractor.
///
/// The only way to hit this is a router that forgot to install
/// [`landmark_layer`](crate::landmark_layer), so it is reported as a server
/// error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkRejection {
    /// No tracker in the request extensions.
    #[error("Landmark middleware not installed")]
    MissingLayer,
}

impl LandmarkRejection {
    const fn code(self) -> &'static str {
        match self {
            Self::MissingLayer => "LANDMARK_LAYER_MISSING",
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for LandmarkRejection {
    fn into_response(self) -> Response {
        tracing::error!(code = self.code(), error = %self, "Internal server error");

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
