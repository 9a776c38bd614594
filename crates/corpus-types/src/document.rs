//! Document type for ingested files.
//!
//! Documents are immutable records created once per ingested file.
//! They are never updated or deleted; re-ingesting the same file
//! appends a new record.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported document container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// PDF container
    Pdf,
    /// Word container
    Docx,
    /// Plain UTF-8 text
    Txt,
}

impl DocumentKind {
    /// Resolve a kind from a lowercase file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    /// Resolve a kind from a filename suffix.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())?;
        Self::from_extension(&ext)
    }

    /// The extension this kind corresponds to, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// An ingested document.
///
/// One record per ingested file, created by the ingestion pipeline
/// before the file's sections are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (ULID string)
    pub document_id: String,

    /// Original filename as supplied at ingestion
    pub filename: String,

    /// Container format, derived from the filename suffix
    pub kind: DocumentKind,

    /// Raw size of the ingested file in bytes
    pub size_bytes: u64,

    /// When the document was processed
    pub processed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document record with a fresh id, stamped now.
    pub fn new(filename: impl Into<String>, kind: DocumentKind, size_bytes: u64) -> Self {
        Self {
            document_id: ulid::Ulid::new().to_string(),
            filename: filename.into(),
            kind,
            size_bytes,
            processed_at: Utc::now(),
        }
    }

    /// Basename of the filename, used as the node label in the
    /// document network.
    pub fn basename(&self) -> String {
        Path::new(&self.filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("txt"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_extension("exe"), None);
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(
            DocumentKind::from_filename("report.DOCX"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_filename("noext"), None);
        assert_eq!(DocumentKind::from_filename("archive.tar.gz"), None);
    }

    #[test]
    fn test_document_basename() {
        let doc = Document::new("uploads/2024/handbook.txt", DocumentKind::Txt, 10);
        assert_eq!(doc.basename(), "handbook.txt");
    }

    #[test]
    fn test_document_serialization_roundtrip() {
        let doc = Document::new("handbook.txt", DocumentKind::Txt, 2048);
        let json = serde_json::to_string(&doc).unwrap();
        let decoded: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(doc.document_id, decoded.document_id);
        assert_eq!(doc.kind, decoded.kind);
        assert_eq!(doc.size_bytes, decoded.size_bytes);
    }
}
