//! Collaborator clients and domain services
//!
//! Everything non-trivial is delegated to an upstream: document
//! examination and profile generation go to the LLM, face embeddings to
//! the face engine sidecar, classification to the sentiment engine. The
//! modules here wrap those collaborators behind typed requests and typed
//! errors. What little local logic exists (embedding distance, the
//! sentiment fold) sits next to the client that feeds it.

pub mod document_validator;
pub mod face_matcher;
pub mod llm_client;
pub mod profile_generator;
pub mod sentiment;
pub mod upload_store;

pub use document_validator::{DocumentError, DocumentReport, DocumentValidator};
pub use face_matcher::{FaceEngineClient, FaceMatchError, FaceMatchReport, FaceMatcher};
pub use llm_client::{ChatMessage, ContentPart, LlmClient, LlmError, MessageContent};
pub use profile_generator::{ProfileError, ProfileGenerator, ProfileInsights};
pub use sentiment::{
    SentimentAnalyzer, SentimentEngineClient, SentimentError, SentimentLabel, SentimentSummary,
    TranslationClient, TranslationError,
};
pub use upload_store::{cpf_file_key, UploadStore};
