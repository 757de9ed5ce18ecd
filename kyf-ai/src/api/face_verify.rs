//! Standalone selfie-to-document verification endpoint

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use kyf_common::VerificationSignal;

use crate::api::fan_analysis::{invalid_cpf, missing_field};
use crate::error::ApiResult;
use crate::services::cpf_file_key;
use crate::AppState;

/// Face verification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceVerifyResponse {
    pub selfie_status: VerificationSignal,
    /// Euclidean embedding distance; lower is a closer match
    pub selfie_match_score: f64,
}

/// POST /faceVerify/
///
/// Multipart fields: `cpf`, `selfie` (image), `document` (image).
/// An image without a detectable face yields the structured
/// `NO_FACE_FOUND` error.
pub async fn verify_face(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<FaceVerifyResponse>> {
    let mut cpf: Option<String> = None;
    let mut selfie: Option<Vec<u8>> = None;
    let mut document: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("cpf") => cpf = Some(field.text().await?),
            Some("selfie") => selfie = Some(field.bytes().await?.to_vec()),
            Some("document") => document = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let cpf = cpf.ok_or_else(|| missing_field("cpf"))?;
    let selfie = selfie.ok_or_else(|| missing_field("selfie"))?;
    let document = document.ok_or_else(|| missing_field("document"))?;

    let cpf_key = cpf_file_key(&cpf).ok_or_else(invalid_cpf)?;
    let selfie_path = state
        .uploads
        .save_upload(&selfie, &format!("{}_selfie.jpg", cpf_key))
        .await?;
    let document_path = state
        .uploads
        .save_upload(&document, &format!("{}_document.jpg", cpf_key))
        .await?;

    let report = state.face_matcher.verify(&selfie_path, &document_path).await?;

    Ok(Json(FaceVerifyResponse {
        selfie_status: report.status,
        selfie_match_score: report.distance,
    }))
}

/// Build face verification routes
pub fn face_verify_routes() -> Router<AppState> {
    Router::new()
        .route("/faceVerify", post(verify_face))
        .route("/faceVerify/", post(verify_face))
}
