use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure envelope the server returns alongside non-2xx statuses or
/// `success: false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload PDF, DOCX, JPG, or PNG files.")]
    UnsupportedType { mime_type: String },
    #[error("File size exceeds 16MB limit.")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("No file selected.")]
    EmptySelection,
    #[error("Document type is required.")]
    EmptyLabel,
}
