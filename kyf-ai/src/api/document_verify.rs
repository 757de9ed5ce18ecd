//! Standalone document validation endpoint

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

/// Document verification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerifyResponse {
    pub document_status: VerificationSignal,
    /// Model explanation; empty for a legitimate document
    pub document_report: Option<String>,
}

/// POST /documentVerify/
///
/// Multipart fields: `cpf`, `document` (image).
pub async fn verify_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<DocumentVerifyResponse>> {
    let mut cpf: Option<String> = None;
    let mut document: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("cpf") => cpf = Some(field.text().await?),
            Some("document") => document = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let cpf = cpf.ok_or_else(|| missing_field("cpf"))?;
    let document = document.ok_or_else(|| missing_field("document"))?;

    let cpf_key = cpf_file_key(&cpf).ok_or_else(invalid_cpf)?;
    let document_path = state
        .uploads
        .save_upload(&document, &format!("{}_document.jpg", cpf_key))
        .await?;

    let report = state.document_validator.validate(&document_path).await?;

    Ok(Json(DocumentVerifyResponse {
        document_status: report.status,
        document_report: report.report,
    }))
}

/// Build document verification routes
pub fn document_verify_routes() -> Router<AppState> {
    Router::new()
        .route("/documentVerify", post(verify_document))
        .route("/documentVerify/", post(verify_document))
}
