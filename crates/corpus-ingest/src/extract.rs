//! Text extraction boundary.
//!
//! Extraction is a pure `bytes -> text` conversion owned by external
//! collaborators; the pipeline only sees this trait. The shipped
//! implementation handles plain text; PDF and Word extractors plug in
//! behind the same trait.

use corpus_types::DocumentKind;

use crate::error::IngestError;

/// Converts a recognized file container into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract text from raw file bytes of the given kind.
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, IngestError>;
}

/// Extractor for plain UTF-8 text files.
///
/// Invalid UTF-8 sequences are replaced, not rejected; a lossy read of
/// a text file beats refusing the whole document.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, IngestError> {
        match kind {
            DocumentKind::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
            other => Err(IngestError::Extraction(format!(
                "no text extractor configured for {} files",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_extraction() {
        let text = PlainTextExtractor
            .extract(b"General requirements.", DocumentKind::Txt)
            .unwrap();
        assert_eq!(text, "General requirements.");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = PlainTextExtractor
            .extract(&[0x68, 0x69, 0xFF], DocumentKind::Txt)
            .unwrap();
        assert!(text.starts_with("hi"));
    }

    #[test]
    fn test_unconfigured_kind_errors() {
        let result = PlainTextExtractor.extract(b"%PDF-1.4", DocumentKind::Pdf);
        assert!(matches!(result, Err(IngestError::Extraction(_))));
    }
}
