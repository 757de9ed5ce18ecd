//! Fan profile analysis endpoint
//!
//! `POST /fanAnalyze/` runs the whole verification workflow for one
//! fan: parse the submitted record, persist both uploads, generate the
//! profile attributes, examine the document, compare the faces, and
//! resolve the consolidated fan status.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use kyf_common::{resolve, VerificationSignal};

use crate::error::{ApiError, ApiResult};
use crate::models::FanProfile;
use crate::services::{cpf_file_key, FaceMatchError};
use crate::AppState;

/// POST /fanAnalyze/
///
/// Multipart fields: `data` (JSON string of fan attributes),
/// `document` (image), `selfie` (image). Responds with the fan record
/// augmented by the verification and analysis fields.
pub async fn analyze_fan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<FanProfile>> {
    let mut data: Option<String> = None;
    let mut document: Option<Vec<u8>> = None;
    let mut selfie: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("data") => data = Some(field.text().await?),
            Some("document") => document = Some(field.bytes().await?.to_vec()),
            Some("selfie") => selfie = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| missing_field("data"))?;
    let document = document.ok_or_else(|| missing_field("document"))?;
    let selfie = selfie.ok_or_else(|| missing_field("selfie"))?;

    let mut fan: FanProfile = serde_json::from_str(&data)
        .map_err(|e| ApiError::BadRequest(format!("Invalid fan data JSON: {}", e)))?;

    let cpf_key = cpf_file_key(&fan.cpf).ok_or_else(invalid_cpf)?;
    let selfie_path = state
        .uploads
        .save_upload(&selfie, &format!("{}_selfie.jpg", cpf_key))
        .await?;
    let document_path = state
        .uploads
        .save_upload(&document, &format!("{}_document.jpg", cpf_key))
        .await?;

    tracing::info!(cpf = %cpf_key, "Fan analysis started");

    // Insights first: the chatbot prompt references the generated fan type
    let insights = state.profile_generator.generate_insights(&fan).await?;
    fan.fan_type = insights.fan_type;
    fan.engagement_score = insights.engagement_score;
    fan.content_preference = insights.content_preference;
    fan.potential_revenue = insights.potential_revenue;
    fan.recommendation_summary = insights.recommendation_summary;

    fan.personal_chatbot = state.profile_generator.generate_chatbot_prompt(&fan).await?;

    let document_report = state.document_validator.validate(&document_path).await?;
    fan.document_status = Some(document_report.status);
    fan.document_report = document_report.report;

    match state.face_matcher.verify(&selfie_path, &document_path).await {
        Ok(face_report) => {
            fan.selfie_status = Some(face_report.status);
            fan.selfie_match_score = Some(face_report.distance);
        }
        // Undetectable faces leave both selfie fields null; the resolver
        // then counts the selfie signal as not verified
        Err(FaceMatchError::NoFaceFound) => {
            tracing::warn!(cpf = %cpf_key, "No faces found; selfie verification skipped");
        }
        Err(err) => return Err(err.into()),
    }

    let document_signal = fan.document_status.unwrap_or(VerificationSignal::Unknown);
    let selfie_signal = fan.selfie_status.unwrap_or(VerificationSignal::Unknown);
    let fan_status = resolve(document_signal, selfie_signal);
    fan.fan_status = Some(fan_status);

    tracing::info!(
        cpf = %cpf_key,
        document_signal = %document_signal,
        selfie_signal = %selfie_signal,
        fan_status = %fan_status,
        "Fan analysis complete"
    );

    Ok(Json(fan))
}

pub(crate) fn missing_field(name: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing multipart field: {}", name))
}

pub(crate) fn invalid_cpf() -> ApiError {
    ApiError::BadRequest("CPF must contain at least one letter or digit".to_string())
}

/// Build fan analysis routes
pub fn fan_analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/fanAnalyze", post(analyze_fan))
        .route("/fanAnalyze/", post(analyze_fan))
}
