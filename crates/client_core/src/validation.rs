//! Client-side checks applied to a selected file before anything touches the
//! network.

use std::path::Path;

use shared::error::ValidationError;
use tracing::debug;

use crate::error::ClientError;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// How the file reached the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Picker,
    Drop,
}

#[derive(Debug, Clone)]
pub struct FileSelection {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    /// Loads a file from disk. Files over the upload limit are not read; the
    /// selection carries only their size so validation can reject them.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let io_error = |source| ClientError::Io {
            path: path.display().to_string(),
            source,
        };
        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        if metadata.len() > MAX_UPLOAD_BYTES {
            debug!(
                path = %path.display(),
                size_bytes = metadata.len(),
                "selection exceeds upload limit; skipping read"
            );
            return Ok(Self {
                file_name,
                mime_type,
                size_bytes: metadata.len(),
                bytes: Vec::new(),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn effective_mime_type(&self) -> String {
        match self.mime_type.as_deref().map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
            _ => mime_guess::from_path(&self.file_name)
                .first()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
        }
    }
}

pub fn validate_selection(selection: &FileSelection) -> Result<(), ValidationError> {
    if selection.file_name.trim().is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    let mime_type = selection.effective_mime_type();
    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(ValidationError::UnsupportedType { mime_type });
    }

    if selection.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: selection.size_bytes,
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
