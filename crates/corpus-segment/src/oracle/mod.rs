//! Section oracle trait and implementations.
//!
//! The oracle is asked to group a bounded sample of paragraphs into
//! titled sections. Responses are parsed through a strict schema; a
//! response that does not conform is an error, never evaluated or
//! partially accepted. Callers recover from any oracle error with the
//! deterministic paragraph fallback.

mod api;
mod mock;

pub use api::{ApiSectionOracle, ApiSectionOracleConfig};
pub use mock::MockSectionOracle;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for section oracle operations.
#[derive(Debug, Error)]
pub enum SegmenterError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("No paragraphs to segment")]
    NoParagraphs,
}

/// A titled section candidate proposed by the oracle.
///
/// The strict schema: exactly a title and a content string, nothing
/// else. Unknown fields reject the whole response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDraft {
    /// Proposed section title
    pub title: String,

    /// Merged paragraph content for the section
    pub content: String,
}

impl SectionDraft {
    /// Create a new draft.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Pluggable section oracle.
#[async_trait]
pub trait SectionOracle: Send + Sync {
    /// Group the sampled paragraphs into titled sections.
    async fn propose_sections(
        &self,
        paragraphs: &[String],
    ) -> Result<Vec<SectionDraft>, SegmenterError>;
}
