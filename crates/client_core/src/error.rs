use shared::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "server rejected request (status {}): {}",
        .status.map(|code| code.to_string()).unwrap_or_else(|| "ok".to_string()),
        .message.as_deref().unwrap_or("no details")
    )]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("{action} is not available while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server url cannot carry request paths: {0}")]
    UnsupportedUrl(String),
}

impl ClientError {
    /// Message shown to the user: validation text and server-supplied
    /// messages pass through, everything else collapses to `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::InvalidState { .. } => self.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
