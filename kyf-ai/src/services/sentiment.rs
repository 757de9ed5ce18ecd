//! Comment sentiment aggregation
//!
//! Each comment is translated Portuguese → English, classified by the
//! sentiment engine (HF text-classification shape), and folded into
//! counts plus two derived indexes. Blank comments are skipped before
//! any network call; a comment batch with nothing scorable yields null
//! indexes rather than an error.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "KYF/0.1.0 (fan verification service)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Translation service errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Translation network error: {0}")]
    NetworkError(String),

    #[error("Translation service error {0}: {1}")]
    ApiError(u16, String),

    #[error("Translation parse error: {0}")]
    ParseError(String),
}

/// Sentiment pipeline errors
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Sentiment engine network error: {0}")]
    NetworkError(String),

    #[error("Sentiment engine error {0}: {1}")]
    EngineError(u16, String),

    #[error("Sentiment engine parse error: {0}")]
    ParseError(String),

    #[error("Sentiment engine returned no classification")]
    EmptyClassification,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "responseData")]
    response_data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// MyMemory-compatible translation client (pt → en)
pub struct TranslationClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TranslationClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TranslationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Translate one Portuguese text to English.
    pub async fn translate_pt_to_en(&self, text: &str) -> Result<String, TranslationError> {
        let url = format!("{}/get", self.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", text), ("langpair", "pt|en")])
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError(status.as_u16(), error_text));
        }

        let translate_response: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::ParseError(e.to_string()))?;

        Ok(translate_response.response_data.translated_text)
    }
}

/// Per-comment sentiment class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map an engine label to a class.
    ///
    /// `LABEL_0`/`LABEL_2` are the raw RoBERTa label names; the plain
    /// names cover engines that expose readable labels. Anything else
    /// counts as neutral.
    fn from_engine(label: &str) -> Self {
        match label {
            "LABEL_2" | "positive" => SentimentLabel::Positive,
            "LABEL_0" | "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    fn score(self) -> i32 {
        match self {
            SentimentLabel::Positive => 1,
            SentimentLabel::Negative => -1,
            SentimentLabel::Neutral => 0,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct Classification {
    label: String,
    score: f64,
}

/// Engine response: nested per-input arrays (HF inference shape) or a
/// flat classification list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<Classification>>),
    Flat(Vec<Classification>),
}

impl ClassifyResponse {
    fn into_top(self) -> Option<Classification> {
        let entries = match self {
            ClassifyResponse::Nested(mut nested) => {
                if nested.is_empty() {
                    return None;
                }
                nested.swap_remove(0)
            }
            ClassifyResponse::Flat(flat) => flat,
        };
        entries
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Client for the sentiment-classification engine
pub struct SentimentEngineClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SentimentEngineClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SentimentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SentimentError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Classify one text; returns the top-scored label's class.
    pub async fn classify(&self, text: &str) -> Result<SentimentLabel, SentimentError> {
        let response = self
            .http_client
            .post(&self.base_url)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SentimentError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SentimentError::EngineError(status.as_u16(), error_text));
        }

        let classify_response: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::ParseError(e.to_string()))?;

        let top = classify_response
            .into_top()
            .ok_or(SentimentError::EmptyClassification)?;

        tracing::debug!(label = %top.label, score = top.score, "Comment classified");

        Ok(SentimentLabel::from_engine(&top.label))
    }
}

/// Aggregated sentiment over one comment batch
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentSummary {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    /// Mean per-comment score as a percentage in [-100, 100], two
    /// decimals; null when nothing was scorable
    pub sentiment_index: Option<f64>,
    /// `sentiment_index` rescaled to [0, 100]; null when nothing was
    /// scorable
    pub normalized_index: Option<i64>,
}

/// Fold classified labels into the summary.
pub fn summarize(labels: &[SentimentLabel]) -> SentimentSummary {
    let mut positive = 0u32;
    let mut negative = 0u32;
    let mut neutral = 0u32;
    let mut total_score = 0i32;

    for label in labels {
        match label {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => neutral += 1,
        }
        total_score += label.score();
    }

    let (sentiment_index, normalized_index) = if labels.is_empty() {
        (None, None)
    } else {
        let mean = f64::from(total_score) / labels.len() as f64;
        // Ties round to the even neighbor in both computations
        let index = (mean * 100.0 * 100.0).round_ties_even() / 100.0;
        let normalized = ((index + 100.0) / 2.0).round_ties_even() as i64;
        (Some(index), Some(normalized))
    };

    SentimentSummary {
        positive,
        negative,
        neutral,
        sentiment_index,
        normalized_index,
    }
}

/// Translation plus classification plus fold for one comment batch
pub struct SentimentAnalyzer {
    translator: TranslationClient,
    engine: SentimentEngineClient,
}

impl SentimentAnalyzer {
    pub fn new(translator: TranslationClient, engine: SentimentEngineClient) -> Self {
        Self { translator, engine }
    }

    /// Analyze a comment batch.
    ///
    /// Blank and whitespace-only comments are skipped without touching
    /// either upstream. Any upstream failure aborts the whole batch.
    pub async fn analyze(&self, comments: &[String]) -> Result<SentimentSummary, SentimentError> {
        let mut labels = Vec::new();

        for comment in comments {
            if comment.trim().is_empty() {
                continue;
            }

            let translated = self.translator.translate_pt_to_en(comment).await?;
            tracing::debug!(translated = %translated, "Translated comment");

            labels.push(self.engine.classify(&translated).await?);
        }

        Ok(summarize(&labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_has_null_indexes() {
        let summary = summarize(&[]);
        assert_eq!(summary.positive, 0);
        assert_eq!(summary.negative, 0);
        assert_eq!(summary.neutral, 0);
        assert_eq!(summary.sentiment_index, None);
        assert_eq!(summary.normalized_index, None);
    }

    #[test]
    fn test_mixed_batch_counts_and_indexes() {
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
        ];
        let summary = summarize(&labels);
        assert_eq!(summary.positive, 2);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 0);
        // mean = 1/3 -> 33.33 as a two-decimal percentage
        assert_eq!(summary.sentiment_index, Some(33.33));
        // (33.33 + 100) / 2 = 66.665 -> 67
        assert_eq!(summary.normalized_index, Some(67));
    }

    #[test]
    fn test_all_negative_batch_hits_scale_floor() {
        let labels = [SentimentLabel::Negative, SentimentLabel::Negative];
        let summary = summarize(&labels);
        assert_eq!(summary.sentiment_index, Some(-100.0));
        assert_eq!(summary.normalized_index, Some(0));
    }

    #[test]
    fn test_all_positive_batch_hits_scale_ceiling() {
        let summary = summarize(&[SentimentLabel::Positive]);
        assert_eq!(summary.sentiment_index, Some(100.0));
        assert_eq!(summary.normalized_index, Some(100));
    }

    #[test]
    fn test_neutral_only_batch_centers_the_scale() {
        let summary = summarize(&[SentimentLabel::Neutral, SentimentLabel::Neutral]);
        assert_eq!(summary.sentiment_index, Some(0.0));
        assert_eq!(summary.normalized_index, Some(50));
    }

    #[test]
    fn test_halfway_normalized_index_rounds_to_even() {
        // mean 0.25 -> index 25.0 -> (25 + 100) / 2 = 62.5 -> 62
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
        ];
        let summary = summarize(&labels);
        assert_eq!(summary.sentiment_index, Some(25.0));
        assert_eq!(summary.normalized_index, Some(62));

        // mean -0.25 -> index -25.0 -> 37.5 -> 38
        let labels = [
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
        ];
        let summary = summarize(&labels);
        assert_eq!(summary.normalized_index, Some(38));
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(
            SentimentLabel::from_engine("LABEL_2"),
            SentimentLabel::Positive
        );
        assert_eq!(
            SentimentLabel::from_engine("LABEL_0"),
            SentimentLabel::Negative
        );
        assert_eq!(
            SentimentLabel::from_engine("LABEL_1"),
            SentimentLabel::Neutral
        );
        assert_eq!(
            SentimentLabel::from_engine("positive"),
            SentimentLabel::Positive
        );
        assert_eq!(
            SentimentLabel::from_engine("totally-unknown"),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn test_nested_engine_response_takes_top_scored_entry() {
        let raw = r#"[[{"label": "LABEL_1", "score": 0.2}, {"label": "LABEL_2", "score": 0.7}]]"#;
        let response: ClassifyResponse = serde_json::from_str(raw).unwrap();
        let top = response.into_top().unwrap();
        assert_eq!(top.label, "LABEL_2");
    }

    #[test]
    fn test_flat_engine_response_is_accepted() {
        let raw = r#"[{"label": "LABEL_0", "score": 0.9}]"#;
        let response: ClassifyResponse = serde_json::from_str(raw).unwrap();
        let top = response.into_top().unwrap();
        assert_eq!(top.label, "LABEL_0");
    }

    #[test]
    fn test_empty_engine_response_yields_none() {
        let raw = "[]";
        let response: ClassifyResponse = serde_json::from_str(raw).unwrap();
        assert!(response.into_top().is_none());
    }
}
