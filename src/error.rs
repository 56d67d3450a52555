//! Error types and handling for the `AirWatch` backend

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the `AirWatch` backend
#[derive(Error, Debug)]
pub enum AirWatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Telemetry pipeline setup errors
    #[error("Telemetry error: {message}")]
    Telemetry { message: String },
}

impl AirWatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new telemetry error
    pub fn telemetry<S: Into<String>>(message: S) -> Self {
        Self::Telemetry {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirWatchError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            AirWatchError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirWatchError::Telemetry { .. } => {
                "Telemetry could not be initialized. Check the OTLP endpoint.".to_string()
            }
        }
    }

    /// HTTP status used when the error reaches an API handler
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AirWatchError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed request bodies are reported like any other invalid input.
impl From<JsonRejection> for AirWatchError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AirWatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = json!({
            "error": self.to_string(),
            "message": self.user_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = AirWatchError::config("missing port");
        assert!(matches!(config_err, AirWatchError::Config { .. }));

        let validation_err = AirWatchError::validation("negative pm25");
        assert!(matches!(validation_err, AirWatchError::Validation { .. }));

        let telemetry_err = AirWatchError::telemetry("exporter failed");
        assert!(matches!(telemetry_err, AirWatchError::Telemetry { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = AirWatchError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = AirWatchError::validation("pm25 must be finite");
        assert!(validation_err.user_message().contains("pm25 must be finite"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AirWatchError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AirWatchError::telemetry("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = AirWatchError::validation("bad reading").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
