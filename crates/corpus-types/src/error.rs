//! Error types shared across the corpus-index system.

use thiserror::Error;

/// Unified error type for cross-cutting operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
