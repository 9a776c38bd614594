//! Mock section oracle for testing.

use async_trait::async_trait;

use super::{SectionDraft, SectionOracle, SegmenterError};

/// Mock section oracle that returns deterministic drafts.
///
/// Useful for testing without making API calls.
pub struct MockSectionOracle {
    drafts: Option<Vec<SectionDraft>>,
    fail: bool,
}

impl MockSectionOracle {
    /// Create a mock oracle that derives one draft per paragraph,
    /// titled by the paragraph's leading words.
    pub fn new() -> Self {
        Self {
            drafts: None,
            fail: false,
        }
    }

    /// Create a mock oracle returning exactly these drafts.
    pub fn with_sections(drafts: Vec<SectionDraft>) -> Self {
        Self {
            drafts: Some(drafts),
            fail: false,
        }
    }

    /// Create a mock oracle whose every call fails.
    pub fn failing() -> Self {
        Self {
            drafts: None,
            fail: true,
        }
    }
}

impl Default for MockSectionOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SectionOracle for MockSectionOracle {
    async fn propose_sections(
        &self,
        paragraphs: &[String],
    ) -> Result<Vec<SectionDraft>, SegmenterError> {
        if self.fail {
            return Err(SegmenterError::ApiError(
                "mock oracle configured to fail".to_string(),
            ));
        }

        if paragraphs.is_empty() {
            return Err(SegmenterError::NoParagraphs);
        }

        if let Some(drafts) = &self.drafts {
            return Ok(drafts.clone());
        }

        Ok(paragraphs
            .iter()
            .map(|p| {
                let title: String = p.split_whitespace().take(4).collect::<Vec<_>>().join(" ");
                SectionDraft::new(title, p.clone())
            })
            .collect())
    }
}
