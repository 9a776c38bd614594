//! # corpus-segment
//!
//! Segmentation adapter for corpus-index.
//!
//! Turns raw extracted document text into an ordered sequence of titled
//! sections. A deterministic pre-split on blank-line boundaries feeds a
//! bounded paragraph sample to a pluggable oracle (an LLM behind an
//! OpenAI-compatible or Anthropic endpoint); if the oracle fails or
//! returns anything the strict schema rejects, a deterministic
//! paragraph-per-section fallback takes over, so segmentation itself
//! never fails.

pub mod oracle;
pub mod paragraphs;
pub mod segmenter;

pub use oracle::{
    ApiSectionOracle, ApiSectionOracleConfig, MockSectionOracle, SectionDraft, SectionOracle,
    SegmenterError,
};
pub use paragraphs::split_paragraphs;
pub use segmenter::{DocumentSegmenter, SegmenterConfig};
