//! Selfie-to-document face comparison
//!
//! Face embeddings come from the face-embedding engine sidecar (one
//! HTTP request per image, content base64-encoded); the comparison
//! itself is local: Euclidean distance between the first embedding of
//! each image against a configured tolerance. An image with no
//! detectable face is a soft, typed outcome, not a transport failure.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use kyf_common::VerificationSignal;

const USER_AGENT: &str = "KYF/0.1.0 (fan verification service)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Face matching errors
#[derive(Debug, Error)]
pub enum FaceMatchError {
    /// At least one image contained no detectable face
    #[error("No faces found in images.")]
    NoFaceFound,

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Face engine network error: {0}")]
    NetworkError(String),

    #[error("Face engine error {0}: {1}")]
    EngineError(u16, String),

    #[error("Face engine parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embeddings: Vec<Vec<f64>>,
}

/// Client for the face-embedding engine sidecar
pub struct FaceEngineClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl FaceEngineClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FaceMatchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FaceMatchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// All face embeddings the engine finds in one image.
    ///
    /// An empty vector means no face was detected; the caller decides
    /// what that means.
    pub async fn embeddings(&self, image: &[u8]) -> Result<Vec<Vec<f64>>, FaceMatchError> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let encoded = BASE64.encode(image);

        tracing::debug!(image_bytes = image.len(), "Requesting face embeddings");

        let response = self
            .http_client
            .post(&url)
            .json(&EmbeddingsRequest { image: &encoded })
            .send()
            .await
            .map_err(|e| FaceMatchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FaceMatchError::EngineError(status.as_u16(), error_text));
        }

        let embeddings_response: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| FaceMatchError::ParseError(e.to_string()))?;

        Ok(embeddings_response.embeddings)
    }
}

/// Result of comparing a selfie against a document photo
#[derive(Debug, Clone)]
pub struct FaceMatchReport {
    /// `Verified` when the embedding distance is within tolerance
    pub status: VerificationSignal,
    /// Euclidean distance between the two first embeddings
    pub distance: f64,
}

/// Selfie-to-document matcher
pub struct FaceMatcher {
    engine: FaceEngineClient,
    tolerance: f64,
}

impl FaceMatcher {
    pub fn new(engine: FaceEngineClient, tolerance: f64) -> Self {
        Self { engine, tolerance }
    }

    /// Compare the faces in the two images.
    ///
    /// # Errors
    ///
    /// `NoFaceFound` when either image yields zero embeddings; engine
    /// transport and payload failures otherwise.
    pub async fn verify(
        &self,
        selfie_path: &Path,
        document_path: &Path,
    ) -> Result<FaceMatchReport, FaceMatchError> {
        let selfie_bytes = tokio::fs::read(selfie_path).await?;
        let document_bytes = tokio::fs::read(document_path).await?;

        let selfie_embeddings = self.engine.embeddings(&selfie_bytes).await?;
        let document_embeddings = self.engine.embeddings(&document_bytes).await?;

        let (Some(selfie_embedding), Some(document_embedding)) =
            (selfie_embeddings.first(), document_embeddings.first())
        else {
            return Err(FaceMatchError::NoFaceFound);
        };

        let report = compare_embeddings(selfie_embedding, document_embedding, self.tolerance)?;

        tracing::info!(
            distance = report.distance,
            tolerance = self.tolerance,
            status = %report.status,
            "Face comparison complete"
        );

        Ok(report)
    }
}

/// Compare two embeddings against the tolerance.
///
/// The engine emits fixed-dimension embeddings; a length mismatch means
/// a malformed response, not a legitimate comparison.
fn compare_embeddings(
    selfie: &[f64],
    document: &[f64],
    tolerance: f64,
) -> Result<FaceMatchReport, FaceMatchError> {
    if selfie.len() != document.len() {
        return Err(FaceMatchError::ParseError(format!(
            "Embedding dimension mismatch: selfie {}, document {}",
            selfie.len(),
            document.len()
        )));
    }

    let distance = euclidean_distance(selfie, document);
    Ok(FaceMatchReport {
        status: match_status(distance, tolerance),
        distance,
    })
}

/// Euclidean distance between two embedding vectors
fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// A distance exactly at the tolerance still counts as a match
fn match_status(distance: f64, tolerance: f64) -> VerificationSignal {
    if distance <= tolerance {
        VerificationSignal::Verified
    } else {
        VerificationSignal::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_of_identical_embeddings_is_zero() {
        let embedding = vec![0.1, 0.2, 0.3];
        assert_eq!(euclidean_distance(&embedding, &embedding), 0.0);
    }

    #[test]
    fn test_distance_matches_hand_computed_value() {
        // 3-4-5 triangle
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_at_tolerance_is_verified() {
        assert_eq!(match_status(0.6, 0.6), VerificationSignal::Verified);
    }

    #[test]
    fn test_distance_above_tolerance_is_rejected() {
        assert_eq!(match_status(0.6001, 0.6), VerificationSignal::Rejected);
    }

    #[test]
    fn test_distance_below_tolerance_is_verified() {
        assert_eq!(match_status(0.31, 0.6), VerificationSignal::Verified);
    }

    #[test]
    fn test_mismatched_embedding_lengths_are_rejected() {
        let result = compare_embeddings(&[0.1, 0.2], &[0.1, 0.2, 0.3], 0.6);
        assert!(matches!(result, Err(FaceMatchError::ParseError(_))));
    }

    #[test]
    fn test_equal_length_embeddings_produce_a_report() {
        let report = compare_embeddings(&[0.0, 0.0], &[3.0, 4.0], 6.0).unwrap();
        assert!((report.distance - 5.0).abs() < 1e-12);
        assert_eq!(report.status, VerificationSignal::Verified);
    }

    #[test]
    fn test_client_creation() {
        let client = FaceEngineClient::new("http://127.0.0.1:8501");
        assert!(client.is_ok());
    }
}
