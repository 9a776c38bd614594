//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Load-time problems are recovered internally (empty collections plus
/// a logged warning) and never reach callers; these variants surface
/// from persistence only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedding matrix encoding error
    #[error("Matrix encoding error: {0}")]
    Matrix(#[from] bincode::Error),

    /// Section and embedding artifact counts diverge
    #[error("section count {sections} does not match embedding row count {rows}")]
    Misaligned { sections: usize, rows: usize },

    /// A section references a document that is not stored
    #[error("section {0} references a missing document")]
    DanglingSection(String),
}
