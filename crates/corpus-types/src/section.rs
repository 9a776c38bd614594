//! Section type: a titled, contiguous span of a document's text.
//!
//! Sections are created in batches during ingestion of one document
//! and are immutable afterwards. Within a document, `index` is a
//! contiguous 0-based range in insertion order.

use serde::{Deserialize, Serialize};

/// A titled span of document text, the atomic unit of indexing and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier (ULID string)
    pub section_id: String,

    /// Owning document's id
    pub document_id: String,

    /// Position within the owning document, 0-based
    pub index: usize,

    /// Section title
    pub title: String,

    /// Section body, trimmed
    pub content: String,

    /// Whitespace-delimited token count of the trimmed content
    pub word_count: usize,
}

impl Section {
    /// Create a new section with a fresh id.
    ///
    /// Content is trimmed and `word_count` computed from it.
    pub fn new(
        document_id: impl Into<String>,
        index: usize,
        title: impl Into<String>,
        content: &str,
    ) -> Self {
        let content = content.trim().to_string();
        let word_count = content.split_whitespace().count();
        Self {
            section_id: ulid::Ulid::new().to_string(),
            document_id: document_id.into(),
            index,
            title: title.into(),
            content,
            word_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_trims_and_counts_words() {
        let section = Section::new("doc-1", 0, "Scope", "  general   requirements apply  ");
        assert_eq!(section.content, "general   requirements apply");
        assert_eq!(section.word_count, 3);
    }

    #[test]
    fn test_empty_content() {
        let section = Section::new("doc-1", 2, "Blank", "   ");
        assert_eq!(section.content, "");
        assert_eq!(section.word_count, 0);
        assert_eq!(section.index, 2);
    }

    #[test]
    fn test_section_serialization_roundtrip() {
        let section = Section::new("doc-1", 1, "Definitions", "Terms used in this standard.");
        let json = serde_json::to_string(&section).unwrap();
        let decoded: Section = serde_json::from_str(&json).unwrap();

        assert_eq!(section.section_id, decoded.section_id);
        assert_eq!(section.index, decoded.index);
        assert_eq!(section.word_count, decoded.word_count);
    }
}
