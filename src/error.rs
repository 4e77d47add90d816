// src/error.rs

use std::fmt;
use std::io;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Error type for relay operations
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum RelayError {
    /// Missing or malformed request fields, rejected before any mutation
    Validation(String),
    /// The notification target could not be resolved
    DestinationUnavailable(String),
    /// Snapshot could not be written; in-memory state stays authoritative
    Persistence(String),
    /// Notification delivery failed or timed out
    Notification(String),
    /// IO-related errors
    IoError(io::Error),
    /// JSON encoding or decoding errors
    JsonError(serde_json::Error),
    /// Configuration errors
    ConfigError(String),
    /// API server errors
    ApiError(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Validation(e) => write!(f, "Validation error: {}", e),
            RelayError::DestinationUnavailable(e) => {
                write!(f, "Destination unavailable: {}", e)
            }
            RelayError::Persistence(e) => write!(f, "Persistence error: {}", e),
            RelayError::Notification(e) => write!(f, "Notification error: {}", e),
            RelayError::IoError(e) => write!(f, "IO error: {}", e),
            RelayError::JsonError(e) => write!(f, "JSON error: {}", e),
            RelayError::ConfigError(e) => write!(f, "Config error: {}", e),
            RelayError::ApiError(e) => write!(f, "API error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::IoError(e) => Some(e),
            RelayError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::DestinationUnavailable(_)
            | RelayError::Persistence(_)
            | RelayError::Notification(_)
            | RelayError::IoError(_)
            | RelayError::JsonError(_)
            | RelayError::ConfigError(_)
            | RelayError::ApiError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<io::Error> for RelayError {
    fn from(err: io::Error) -> Self {
        RelayError::IoError(err)
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::JsonError(err)
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Notification(format!("request timed out: {}", err))
        } else {
            RelayError::Notification(err.to_string())
        }
    }
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
