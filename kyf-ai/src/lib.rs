//! kyf-ai library interface
//!
//! Exposes the application state and router builder so integration
//! tests can drive the service in-process.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{
    DocumentValidator, FaceEngineClient, FaceMatcher, LlmClient, ProfileGenerator,
    SentimentAnalyzer, SentimentEngineClient, TranslationClient, UploadStore,
};

/// Uploads are phone-camera images; anything larger is refused
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub profile_generator: Arc<ProfileGenerator>,
    pub document_validator: Arc<DocumentValidator>,
    pub face_matcher: Arc<FaceMatcher>,
    pub sentiment: Arc<SentimentAnalyzer>,
    pub uploads: UploadStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire up all collaborator clients from the resolved configuration.
    ///
    /// The LLM client is shared between the profile generator and the
    /// document validator.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let llm = Arc::new(LlmClient::new(
            &config.llm_base_url,
            &config.llm_api_key,
            &config.llm_model,
        )?);

        let face_engine = FaceEngineClient::new(&config.face_engine_url)?;
        let translator = TranslationClient::new(&config.translate_url)?;
        let sentiment_engine = SentimentEngineClient::new(&config.sentiment_engine_url)?;

        Ok(Self {
            profile_generator: Arc::new(ProfileGenerator::new(Arc::clone(&llm))),
            document_validator: Arc::new(DocumentValidator::new(llm)),
            face_matcher: Arc::new(FaceMatcher::new(face_engine, config.face_match_tolerance)),
            sentiment: Arc::new(SentimentAnalyzer::new(translator, sentiment_engine)),
            uploads: UploadStore::new(config.upload_dir.clone()),
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::fan_analysis_routes())
        .merge(api::face_verify_routes())
        .merge(api::document_verify_routes())
        .merge(api::sentiment_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
