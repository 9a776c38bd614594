//! Ingestion error types.

use thiserror::Error;

use corpus_embeddings::EmbeddingError;
use corpus_store::StoreError;

/// Errors that can occur while ingesting a document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Unrecognized file extension; raised before any state mutation
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Text extraction failed for a recognized format
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The embedding oracle failed for a section; the document is aborted
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Persisting the completed document failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
