//! Identity document validation via LLM vision
//!
//! Sends the saved document image to the chat completions API as a
//! base64 data URL together with an examiner instruction, and parses
//! the model's JSON verdict into a typed report. One request per
//! document, no retries.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use kyf_common::VerificationSignal;

use super::llm_client::{strip_code_fence, ChatMessage, ContentPart, LlmClient, LlmError};

const EXAMINER_SYSTEM_PROMPT: &str =
    "You are an expert in Brazilian identity documents and RG analysis.";

const EXAMINER_INSTRUCTIONS: &str = "Analyze the image of a Brazilian RG identity document. \
Based on the standard layout, check whether it carries a photo, a signature and a fingerprint, \
and state whether the document is legitimate. \
Answer in the following JSON format:\n\n\
{\n\
  \"documentStatus\": verified  // or rejected\n\
  \"documentReport\": \"\" // If invalid, explain why (200 characters maximum)\n\
}";

/// Document validation errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document image: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Model verdict is not valid JSON: {0}")]
    InvalidVerdict(String),
}

/// Typed document examination verdict
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// `Verified` or `Rejected` per the model; `Unknown` when the model
    /// answered with JSON but an unrecognized status value
    pub status: VerificationSignal,
    /// Model explanation; empty or absent for a legitimate document
    pub report: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    #[serde(default)]
    document_status: Option<String>,
    #[serde(default)]
    document_report: Option<String>,
}

/// LLM-backed identity document validator
pub struct DocumentValidator {
    llm: Arc<LlmClient>,
}

impl DocumentValidator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Examine the document image at `document_path`.
    pub async fn validate(&self, document_path: &Path) -> Result<DocumentReport, DocumentError> {
        let bytes = tokio::fs::read(document_path).await?;
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(&bytes));

        let messages = [
            ChatMessage::system(EXAMINER_SYSTEM_PROMPT),
            ChatMessage::user_parts(vec![
                ContentPart::text(EXAMINER_INSTRUCTIONS),
                ContentPart::image_url(data_url),
            ]),
        ];

        let answer = self.llm.chat(&messages).await?;
        let report = parse_verdict(&answer)?;

        tracing::info!(
            document = %document_path.display(),
            status = %report.status,
            "Document examination complete"
        );

        Ok(report)
    }
}

/// Parse the model's JSON verdict, tolerating a Markdown code fence.
fn parse_verdict(answer: &str) -> Result<DocumentReport, DocumentError> {
    let raw: RawVerdict = serde_json::from_str(strip_code_fence(answer)).map_err(|e| {
        tracing::debug!(answer = %answer, "Unparseable document verdict");
        DocumentError::InvalidVerdict(e.to_string())
    })?;

    Ok(DocumentReport {
        status: VerificationSignal::from_status(raw.document_status.as_deref()),
        report: raw.document_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_json_verdict() {
        let report =
            parse_verdict("{\"documentStatus\": \"verified\", \"documentReport\": \"\"}").unwrap();
        assert_eq!(report.status, VerificationSignal::Verified);
        assert_eq!(report.report.as_deref(), Some(""));
    }

    #[test]
    fn test_parses_fenced_verdict() {
        let answer =
            "```json\n{\"documentStatus\": \"rejected\", \"documentReport\": \"No signature\"}\n```";
        let report = parse_verdict(answer).unwrap();
        assert_eq!(report.status, VerificationSignal::Rejected);
        assert_eq!(report.report.as_deref(), Some("No signature"));
    }

    #[test]
    fn test_unrecognized_status_becomes_unknown() {
        let report = parse_verdict("{\"documentStatus\": \"maybe\"}").unwrap();
        assert_eq!(report.status, VerificationSignal::Unknown);
        assert!(report.report.is_none());
    }

    #[test]
    fn test_non_json_verdict_is_an_error() {
        let result = parse_verdict("I could not read the document, sorry.");
        assert!(matches!(result, Err(DocumentError::InvalidVerdict(_))));
    }
}
