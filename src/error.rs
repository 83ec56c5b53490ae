//! Common error types for the image generation service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Prompt is required")]
    PromptRequired,

    #[error("Image generation failed: {0}")]
    Generation(String),
}

/// Error body returned to clients
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client input errors carry their own message; everything else maps
        // to one generic body so internals never leak to callers.
        let (status, message) = match &self {
            AppError::PromptRequired => (StatusCode::BAD_REQUEST, "Prompt is required"),
            _ => {
                error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Image generation failed")
            }
        };

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
