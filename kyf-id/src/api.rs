//! HTTP API handlers for kyf-id

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Extraction response
#[derive(Debug, Serialize)]
pub struct ValidateIdResponse {
    /// Raw text tesseract read from the image
    pub extracted_text: String,
}

/// POST /validate-id
///
/// Multipart field: `document` (image). Returns the extracted text.
pub async fn validate_id(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ValidateIdResponse>> {
    let mut document: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("document") {
            document = Some(field.bytes().await?.to_vec());
        }
    }

    let document = document
        .ok_or_else(|| ApiError::BadRequest("Missing multipart field: document".to_string()))?;

    let extracted_text = state.ocr.extract_text(&document).await?;

    Ok(Json(ValidateIdResponse { extracted_text }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("kyf-id")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "kyf-id".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}

/// Build all kyf-id routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/validate-id", post(validate_id))
        .route("/health", get(health_check))
}
