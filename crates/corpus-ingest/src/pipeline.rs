//! Document ingestion pipeline.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use corpus_embeddings::Embedder;
use corpus_segment::DocumentSegmenter;
use corpus_store::{SectionRecord, SectionStore};
use corpus_types::{Document, DocumentKind};

use crate::error::IngestError;
use crate::extract::TextExtractor;

/// Turns one document's raw bytes into persisted sections and vectors.
///
/// Ingestion is all-or-nothing: every section is embedded before the
/// store is touched, and the store's own commit rolls back if
/// persistence fails, so a failed ingest never leaves partial state.
pub struct IngestPipeline {
    segmenter: DocumentSegmenter,
    embedder: Arc<dyn Embedder>,
    extractor: Box<dyn TextExtractor>,
}

impl IngestPipeline {
    /// Create a pipeline from its injected collaborators.
    pub fn new(
        segmenter: DocumentSegmenter,
        embedder: Arc<dyn Embedder>,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        Self {
            segmenter,
            embedder,
            extractor,
        }
    }

    /// Ingest a single document into the store.
    pub async fn process_document(
        &self,
        store: &mut SectionStore,
        bytes: &[u8],
        filename: &str,
    ) -> Result<(), IngestError> {
        let kind = DocumentKind::from_filename(filename)
            .ok_or_else(|| IngestError::UnsupportedFormat(extension_of(filename)))?;

        let text = self.extractor.extract(bytes, kind)?;

        let document = Document::new(filename, kind, bytes.len() as u64);
        debug!(
            document_id = %document.document_id,
            filename,
            kind = %kind,
            size_bytes = document.size_bytes,
            "Extracted document text"
        );

        let sections = self.segmenter.segment(&text, &document.document_id).await;

        let mut records = Vec::with_capacity(sections.len());
        for section in sections {
            let embedding = self.embedder.embed(&section.content).await?;
            records.push(SectionRecord::new(section, embedding));
        }

        info!(
            document_id = %document.document_id,
            filename,
            sections = records.len(),
            "Ingested document"
        );

        store.commit_document(document, records)?;
        Ok(())
    }
}

/// The lowercase extension of a filename, or the whole name when it
/// has none; used to report unsupported formats.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_embeddings::MockEmbedder;
    use corpus_segment::{MockSectionOracle, SegmenterConfig};

    fn pipeline_with(embedder: MockEmbedder, oracle: MockSectionOracle) -> IngestPipeline {
        IngestPipeline::new(
            DocumentSegmenter::new(Arc::new(oracle), SegmenterConfig::default()),
            Arc::new(embedder),
            Box::new(crate::extract::PlainTextExtractor),
        )
    }

    fn open_store() -> (tempfile::TempDir, SectionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SectionStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_process_document_appends_and_persists() {
        let (dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::new(4), MockSectionOracle::new());

        pipeline
            .process_document(&mut store, b"First part.\n\nSecond part.", "standard.txt")
            .await
            .unwrap();

        assert_eq!(store.document_count(), 1);
        assert_eq!(store.section_count(), 2);
        assert_eq!(store.documents()[0].size_bytes, 25);

        // Persisted: a fresh store sees the same state.
        let reloaded = SectionStore::open(dir.path()).unwrap();
        assert_eq!(reloaded.document_count(), 1);
        assert_eq!(reloaded.section_count(), 2);
    }

    #[tokio::test]
    async fn test_sections_reference_their_document() {
        let (_dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::new(4), MockSectionOracle::new());

        pipeline
            .process_document(&mut store, b"One.\n\nTwo.\n\nThree.", "a.txt")
            .await
            .unwrap();

        let doc_id = &store.documents()[0].document_id;
        for (i, record) in store.records().iter().enumerate() {
            assert_eq!(&record.section.document_id, doc_id);
            assert_eq!(record.section.index, i);
        }
    }

    #[tokio::test]
    async fn test_unsupported_format_rejected_before_mutation() {
        let (_dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::new(4), MockSectionOracle::new());

        let result = pipeline
            .process_document(&mut store, b"binary", "image.png")
            .await;

        match result {
            Err(IngestError::UnsupportedFormat(ext)) => assert_eq!(ext, "png"),
            other => panic!("expected UnsupportedFormat, got {:?}", other.err()),
        }
        assert_eq!(store.document_count(), 0);
        assert_eq!(store.section_count(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_all_or_nothing() {
        let (dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::failing(), MockSectionOracle::new());

        let result = pipeline
            .process_document(&mut store, b"One.\n\nTwo.", "a.txt")
            .await;

        assert!(matches!(result, Err(IngestError::Embedding(_))));
        assert_eq!(store.document_count(), 0);
        assert_eq!(store.section_count(), 0);

        let reloaded = SectionStore::open(dir.path()).unwrap();
        assert_eq!(reloaded.document_count(), 0);
    }

    #[tokio::test]
    async fn test_reingest_appends_duplicates() {
        let (_dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::new(4), MockSectionOracle::new());

        pipeline
            .process_document(&mut store, b"Same file.", "dup.txt")
            .await
            .unwrap();
        pipeline
            .process_document(&mut store, b"Same file.", "dup.txt")
            .await
            .unwrap();

        assert_eq!(store.document_count(), 2);
        assert_eq!(store.section_count(), 2);
        assert_ne!(
            store.documents()[0].document_id,
            store.documents()[1].document_id
        );
    }

    #[tokio::test]
    async fn test_empty_document_creates_record_without_sections() {
        let (_dir, mut store) = open_store();
        let pipeline = pipeline_with(MockEmbedder::new(4), MockSectionOracle::new());

        pipeline
            .process_document(&mut store, b"", "empty.txt")
            .await
            .unwrap();

        assert_eq!(store.document_count(), 1);
        assert_eq!(store.section_count(), 0);
    }
}
