//! Error type shared by the composition store, song library and session.
//!
//! The `Display` text of each variant is the message shown to the user, so
//! the host can surface `err.to_string()` directly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    /// Rejected input (empty song name, nothing to save or play, unknown id).
    /// Nothing was mutated.
    #[error("{0}")]
    Validation(String),

    /// Writing to or reading from persistent storage failed.
    /// In-memory state is left as it was before the call.
    #[error("{0}")]
    Storage(String),

    /// A persisted record could not be parsed and was treated as absent.
    #[error("{0}")]
    Malformed(String),

    /// JSON encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ComposerError {
    pub fn validation(message: impl Into<String>) -> Self {
        ComposerError::Validation(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ComposerError::Storage(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ComposerError::Malformed(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ComposerError>;
