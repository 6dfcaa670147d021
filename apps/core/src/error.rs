use std::io;
use thiserror::Error;

/// Crate-wide error type, consolidating all fallible boundaries into a single enum.
///
/// Analysis and response generation are total functions over string input and
/// never return this type; everything fallible sits at the storage and
/// provider boundaries, plus snapshot import.
#[derive(Debug, Error)]
pub enum BrainError {
    /// A knowledge snapshot could not be decoded (malformed import data).
    #[error("Invalid snapshot data: {0}")]
    DataFormat(String),

    /// The persistence collaborator failed; the session continues in memory.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Standard input/output failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The external response provider failed. `fallback_to_local` indicates
    /// whether the caller should re-run the local generation path.
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        fallback_to_local: bool,
    },

    /// Configuration or input validation failure.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl BrainError {
    /// Whether the local generation path should be retried after this error.
    pub fn should_fallback(&self) -> bool {
        matches!(
            self,
            BrainError::Provider {
                fallback_to_local: true,
                ..
            }
        )
    }
}

impl From<serde_json::Error> for BrainError {
    fn from(err: serde_json::Error) -> Self {
        BrainError::DataFormat(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for BrainError {
    fn from(err: reqwest::Error) -> Self {
        // Transport-level failures always leave the local path available.
        BrainError::Provider {
            message: format!("HTTP error: {}", err),
            fallback_to_local: true,
        }
    }
}

impl From<url::ParseError> for BrainError {
    fn from(err: url::ParseError) -> Self {
        BrainError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for BrainError {
    fn from(err: validator::ValidationErrors) -> Self {
        BrainError::Validation(format!("Validation errors: {}", err))
    }
}
