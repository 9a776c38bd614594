//! Embedding oracle trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::embedding::Embedding;

/// Error type for embedding operations.
///
/// Embedding failure is not locally recoverable: a section or query
/// without a vector cannot participate in similarity ranking, so these
/// errors surface to the enclosing ingestion or search call.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Pluggable embedding oracle.
///
/// Implementations are stateless and must truncate their input to
/// [`crate::MAX_EMBED_CHARS`] characters before submission. No retry
/// policy is defined at this level; callers treat any failure as a
/// hard error for the enclosing operation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}
