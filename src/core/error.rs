//! Error types and error handling for the Gavel service.
//!
//! This module defines the error taxonomy used throughout the
//! application: missing blobs, malformed documents, summarization
//! upstream failures, and object-store failures. HTTP status
//! mapping lives here so handlers can return errors directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type alias for Gavel operations
pub type Result<T> = std::result::Result<T, GavelError>;

/// Main error type for the Gavel service
#[derive(Error, Debug)]
pub enum GavelError {
    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Summarization upstream error: {0}")]
    Upstream(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GavelError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GavelError::BlobNotFound(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            GavelError::InvalidRequest(_) | GavelError::Extraction(_) | GavelError::Config(_)
        )
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GavelError::BlobNotFound(_) => StatusCode::NOT_FOUND,
            GavelError::InvalidRequest(_) | GavelError::Extraction(_) | GavelError::Config(_) => {
                StatusCode::BAD_REQUEST
            }
            GavelError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GavelError::Store(_)
            | GavelError::Io(_)
            | GavelError::Serde(_)
            | GavelError::Toml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for GavelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
