//! Error types for kyf-id

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ocr::OcrError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Tesseract is not installed on this host (503)
    #[error("OCR engine unavailable")]
    OcrUnavailable,

    /// Tesseract ran but could not extract text (500)
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::OcrUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "OCR_UNAVAILABLE",
                "OCR engine unavailable".to_string(),
            ),
            ApiError::Ocr(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "OCR_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart payload: {}", err))
    }
}

impl From<OcrError> for ApiError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::BinaryNotFound => ApiError::OcrUnavailable,
            OcrError::IoError(e) => ApiError::Io(e),
            other => ApiError::Ocr(other.to_string()),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
