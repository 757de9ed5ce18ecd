//! Error types for kyf-ai
//!
//! One discipline end to end: collaborator wrappers return `Result`, and
//! every failure that reaches the HTTP boundary is rendered as the JSON
//! error envelope. Soft domain conditions (no face found) map to 4xx with
//! a stable code; upstream transport or parse failures map to 502.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{
    DocumentError, FaceMatchError, LlmError, ProfileError, SentimentError,
};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// No face could be located in at least one uploaded image (422)
    #[error("No faces found in images.")]
    NoFaceFound,

    /// An external collaborator (LLM, face engine, sentiment engine,
    /// translator) failed or answered with an unusable payload (502)
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// kyf-common error
    #[error("Common error: {0}")]
    Common(#[from] kyf_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::NoFaceFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_FACE_FOUND",
                "No faces found in images.".to_string(),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
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

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Io(e) => ApiError::Io(e),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<FaceMatchError> for ApiError {
    fn from(err: FaceMatchError) -> Self {
        match err {
            FaceMatchError::NoFaceFound => ApiError::NoFaceFound,
            FaceMatchError::Io(e) => ApiError::Io(e),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<SentimentError> for ApiError {
    fn from(err: SentimentError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
