//! Tesseract OCR wrapper
//!
//! Wraps the `tesseract` command-line binary. Each extraction writes
//! the uploaded image to a uniquely named temp file, runs
//! `tesseract <file> stdout` (plus `-l <language>` when configured),
//! and removes the temp file afterwards.

use std::process::Command;
use thiserror::Error;

/// OCR errors
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract binary not found in PATH
    #[error("Tesseract binary not found in PATH")]
    BinaryNotFound,

    /// Failed to execute the tesseract command
    #[error("Failed to execute tesseract: {0}")]
    ExecutionError(String),

    /// Tesseract ran but exited with an error
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    /// I/O error (temp file write)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tesseract command-line client
pub struct TesseractClient {
    binary_path: String,
    language: Option<String>,
}

impl TesseractClient {
    /// Create a client for the given binary.
    ///
    /// Construction never touches the binary; a missing installation
    /// surfaces as `BinaryNotFound` on the first extraction instead.
    pub fn new(binary_path: impl Into<String>, language: Option<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            language,
        }
    }

    /// Check whether the configured binary answers `--version`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .is_ok()
    }

    /// Extract text from one image.
    pub async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let temp_input = std::env::temp_dir().join(format!("kyf_id_{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&temp_input, image).await?;

        tracing::debug!(
            input_file = %temp_input.display(),
            image_bytes = image.len(),
            "Running tesseract extraction"
        );

        let result = tokio::task::spawn_blocking({
            let binary = self.binary_path.clone();
            let input = temp_input.clone();
            let language = self.language.clone();

            move || {
                let mut command = Command::new(&binary);
                command.arg(&input).arg("stdout");
                if let Some(language) = &language {
                    command.args(["-l", language]);
                }
                command.output()
            }
        })
        .await
        .map_err(|e| OcrError::ExecutionError(format!("Task join error: {}", e)));

        // Temp file is removed whatever the outcome
        let _ = std::fs::remove_file(&temp_input);

        let output = match result? {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::BinaryNotFound)
            }
            Err(e) => return Err(OcrError::ExecutionError(e.to_string())),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ExtractionFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        tracing::info!(characters = text.len(), "Text extraction completed");

        Ok(text)
    }
}
