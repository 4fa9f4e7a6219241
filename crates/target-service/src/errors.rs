use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File read failed: {0}")]
    FileRead(String),

    #[error("Host lookup failed: {0}")]
    Lookup(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for TargetError {
    fn into_response(self) -> Response {
        // Details are logged by the handlers; clients only see the generic text.
        let (status, code, message) = match &self {
            TargetError::InvalidFilename(name) => (
                StatusCode::BAD_REQUEST,
                "INVALID_FILENAME",
                format!("Filename must be a relative path: {}", name),
            ),
            TargetError::FileNotFound(name) => (
                StatusCode::NOT_FOUND,
                "FILE_NOT_FOUND",
                format!("No such file: {}", name),
            ),
            TargetError::FileRead(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FILE_READ_ERROR",
                "The requested file could not be read".to_string(),
            ),
            TargetError::Lookup(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LOOKUP_FAILED",
                "The scaled service could not be resolved".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
