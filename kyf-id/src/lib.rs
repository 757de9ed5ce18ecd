//! kyf-id library interface
//!
//! Exposes the application state and router builder so integration
//! tests can drive the service in-process.

pub mod api;
pub mod config;
pub mod error;
pub mod ocr;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::ocr::TesseractClient;

/// Uploads are phone-camera images; anything larger is refused
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<TesseractClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            ocr: Arc::new(TesseractClient::new(
                &config.tesseract_binary,
                config.tesseract_language.clone(),
            )),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
