//! Saiy Error Types
//!
//! Centralized error handling for the resolution pipeline.

use thiserror::Error;

/// Central error type for Saiy
#[derive(Error, Debug)]
pub enum SaiyError {
    #[error("NLU payload error ({provider}): {message}")]
    Nlu { provider: String, message: String },

    #[error("Unknown NLU provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown matching algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Command registry error: {0}")]
    Registry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Saiy operations
pub type SaiyResult<T> = Result<T, SaiyError>;

impl SaiyError {
    /// Build an NLU error tagged with the provider that produced it
    pub fn nlu(provider: impl std::fmt::Display, message: impl Into<String>) -> Self {
        SaiyError::Nlu {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
