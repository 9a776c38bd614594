//! Document segmentation engine.
//!
//! Composes the paragraph pre-split, the section oracle, and the
//! deterministic fallback into final `Section` records. Segmentation
//! never fails: any oracle or parse error degrades to the fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use corpus_types::Section;

use crate::oracle::{SectionDraft, SectionOracle};
use crate::paragraphs::split_paragraphs;

/// Configuration for the document segmenter.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// How many leading paragraphs are sent to the oracle
    pub sample_paragraphs: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            sample_paragraphs: 10,
        }
    }
}

/// Splits extracted document text into titled, indexed sections.
pub struct DocumentSegmenter {
    oracle: Arc<dyn SectionOracle>,
    config: SegmenterConfig,
}

impl DocumentSegmenter {
    /// Create a new segmenter around the given oracle.
    pub fn new(oracle: Arc<dyn SectionOracle>, config: SegmenterConfig) -> Self {
        Self { oracle, config }
    }

    /// Segment document text into ordered sections owned by `document_id`.
    ///
    /// Non-empty text always yields at least one section. Empty or
    /// whitespace-only text yields none.
    pub async fn segment(&self, text: &str, document_id: &str) -> Vec<Section> {
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            debug!(document_id, "No paragraphs in document text");
            return Vec::new();
        }

        let sample_len = paragraphs.len().min(self.config.sample_paragraphs);

        let drafts = match self.oracle.propose_sections(&paragraphs[..sample_len]).await {
            Ok(drafts) if !drafts.is_empty() => {
                debug!(
                    document_id,
                    sections = drafts.len(),
                    sampled = sample_len,
                    "Oracle proposed sections"
                );
                drafts
            }
            Ok(_) => {
                warn!(document_id, "Oracle returned no sections, using paragraph fallback");
                fallback_drafts(&paragraphs)
            }
            Err(e) => {
                warn!(
                    document_id,
                    error = %e,
                    "Section oracle failed, using paragraph fallback"
                );
                fallback_drafts(&paragraphs)
            }
        };

        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let title = if draft.title.trim().is_empty() {
                    format!("Section {}", index + 1)
                } else {
                    draft.title
                };
                Section::new(document_id, index, title, &draft.content)
            })
            .collect()
    }
}

/// Deterministic fallback: each paragraph becomes its own section,
/// titled "Section {n}" in paragraph order.
fn fallback_drafts(paragraphs: &[String]) -> Vec<SectionDraft> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, p)| SectionDraft::new(format!("Section {}", i + 1), p.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockSectionOracle;

    fn segmenter(oracle: MockSectionOracle) -> DocumentSegmenter {
        DocumentSegmenter::new(Arc::new(oracle), SegmenterConfig::default())
    }

    #[tokio::test]
    async fn test_segment_uses_oracle_drafts() {
        let oracle = MockSectionOracle::with_sections(vec![
            SectionDraft::new("Scope", "Applies to mobile cranes."),
            SectionDraft::new("Definitions", "Terms used herein."),
        ]);

        let sections = segmenter(oracle)
            .segment("Applies to mobile cranes.\n\nTerms used herein.", "doc-1")
            .await;

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Scope");
        assert_eq!(sections[0].index, 0);
        assert_eq!(sections[1].index, 1);
        assert_eq!(sections[0].document_id, "doc-1");
        assert_eq!(sections[1].word_count, 3);
    }

    #[tokio::test]
    async fn test_segment_fallback_on_oracle_failure() {
        let sections = segmenter(MockSectionOracle::failing())
            .segment("First block.\n\nSecond block.", "doc-1")
            .await;

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Section 1");
        assert_eq!(sections[0].content, "First block.");
        assert_eq!(sections[1].title, "Section 2");
        assert_eq!(sections[1].content, "Second block.");
    }

    #[tokio::test]
    async fn test_segment_fallback_on_empty_oracle_result() {
        let oracle = MockSectionOracle::with_sections(vec![]);
        let sections = segmenter(oracle).segment("Only block.", "doc-1").await;

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Section 1");
    }

    #[tokio::test]
    async fn test_segment_empty_text_yields_nothing() {
        let sections = segmenter(MockSectionOracle::new()).segment("  \n\n ", "doc-1").await;
        assert!(sections.is_empty());
    }

    #[tokio::test]
    async fn test_segment_nonempty_text_yields_at_least_one_section() {
        let sections = segmenter(MockSectionOracle::failing())
            .segment("lone paragraph", "doc-1")
            .await;
        assert!(!sections.is_empty());
    }

    #[tokio::test]
    async fn test_blank_oracle_title_gets_positional_name() {
        let oracle = MockSectionOracle::with_sections(vec![SectionDraft::new("  ", "body text")]);
        let sections = segmenter(oracle).segment("body text", "doc-1").await;

        assert_eq!(sections[0].title, "Section 1");
    }

    #[tokio::test]
    async fn test_oracle_sample_is_bounded() {
        // 15 paragraphs, default sample of 10: the failing oracle still
        // triggers the fallback over ALL paragraphs.
        let text: String = (0..15)
            .map(|i| format!("Paragraph number {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");

        let sections = segmenter(MockSectionOracle::failing()).segment(&text, "doc-1").await;

        assert_eq!(sections.len(), 15);
        assert_eq!(sections[14].title, "Section 15");
    }
}
