//! Error types for the Overtype API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use overtype_pdf::MutateError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No PDF file provided")]
    MissingFile,

    #[error("Invalid instructions JSON: {0}")]
    InvalidInstructions(String),

    #[error("Malformed upload: {0}")]
    BadUpload(String),

    #[error("PDF processing failed: {0}")]
    Engine(#[from] MutateError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingFile => {
                (StatusCode::BAD_REQUEST, "No PDF file provided.".to_string())
            }
            ApiError::InvalidInstructions(detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid instructions JSON: {detail}"),
            ),
            ApiError::BadUpload(detail) => {
                (StatusCode::BAD_REQUEST, format!("Malformed upload: {detail}"))
            }
            ApiError::Engine(e) => {
                // Engine detail stays in the log; the contract only
                // promises a generic message.
                tracing::error!("PDF processing failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process the PDF.".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
