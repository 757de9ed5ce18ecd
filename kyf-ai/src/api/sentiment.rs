//! Comment sentiment endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::services::SentimentSummary;
use crate::AppState;

/// Sentiment analysis request
#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub comments: Vec<String>,
}

/// POST /sentimentAnalyze/
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> ApiResult<Json<SentimentSummary>> {
    tracing::info!(comments = request.comments.len(), "Sentiment analysis started");
    let summary = state.sentiment.analyze(&request.comments).await?;
    Ok(Json(summary))
}

/// Build sentiment routes
pub fn sentiment_routes() -> Router<AppState> {
    Router::new()
        .route("/sentimentAnalyze", post(analyze_sentiment))
        .route("/sentimentAnalyze/", post(analyze_sentiment))
}
