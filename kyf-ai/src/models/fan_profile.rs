//! Fan profile record
//!
//! The record the profile backend submits as the `data` multipart field
//! and receives back augmented with verification and analysis fields.
//! Wire names are camelCase (the backend stores the object as-is);
//! unknown fields are ignored.

use chrono::{DateTime, Utc};
use kyf_common::{FanVerificationOutcome, VerificationSignal};
use serde::{Deserialize, Serialize};

/// Fan attribute record carried through `/fanAnalyze/`.
///
/// The first block is client-supplied registration data. The analysis
/// blocks start out null and are filled in by the handlers; fields the
/// pipeline could not produce stay null in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanProfile {
    pub full_name: String,
    pub nickname: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub cpf_display: String,
    pub cpf: String,
    pub location: String,
    pub socials: Vec<String>,
    pub ecommerce: Vec<String>,
    pub content: Vec<String>,
    #[serde(default)]
    pub influencers: Option<String>,
    #[serde(default)]
    pub events: Option<String>,
    #[serde(default)]
    pub favorite_game: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub others: Option<String>,
    #[serde(default)]
    pub exclusive_content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,

    // Verification outputs
    #[serde(default)]
    pub document_status: Option<VerificationSignal>,
    #[serde(default)]
    pub document_report: Option<String>,
    #[serde(default)]
    pub selfie_status: Option<VerificationSignal>,
    #[serde(default)]
    pub selfie_match_score: Option<f64>,
    #[serde(default)]
    pub fan_status: Option<FanVerificationOutcome>,

    // Profile-generation outputs
    #[serde(default)]
    pub fan_type: Option<String>,
    #[serde(default)]
    pub engagement_score: Option<i64>,
    #[serde(default)]
    pub content_preference: Option<String>,
    #[serde(default)]
    pub potential_revenue: Option<String>,
    #[serde(default)]
    pub recommendation_summary: Option<String>,
    #[serde(default)]
    pub personal_chatbot: Option<String>,

    // Record metadata owned by the profile backend; passed through
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "fan_id")]
    pub fan_id: Option<String>,
}
