//! Upload persistence
//!
//! Uploaded document and selfie images land in one flat directory under
//! deterministic names (`{cpf}_document.jpg`, `{cpf}_selfie.jpg`). Any
//! two requests carrying the same CPF write to the same paths, so a
//! later upload replaces an earlier one. Files are never cleaned up.

use std::path::PathBuf;

/// Flat file store for uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` as `file_name` under the store root.
    ///
    /// The directory is created on demand; an existing file with the
    /// same name is overwritten.
    pub async fn save_upload(&self, bytes: &[u8], file_name: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(
            path = %path.display(),
            size = bytes.len(),
            "Stored upload"
        );

        Ok(path)
    }
}

/// Filesystem key for a client-supplied CPF.
///
/// Keeps ASCII alphanumeric characters only, so the value can never
/// carry path separators or dot segments into the file name. `None`
/// when nothing usable remains.
pub fn cpf_file_key(cpf: &str) -> Option<String> {
    let key: String = cpf
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
