//! End-to-end test infrastructure for corpus-index.
//!
//! Provides a shared TestHarness and helper functions for E2E tests
//! covering the full ingest-to-search pipeline against mock oracles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use corpus_embeddings::MockEmbedder;
use corpus_engine::CorpusEngine;
use corpus_ingest::PlainTextExtractor;
use corpus_segment::{MockSectionOracle, SegmenterConfig};
use corpus_store::SectionStore;

/// Shared test harness for E2E tests.
///
/// Owns a temp data directory and an engine wired to deterministic
/// mock oracles, so no test touches the network.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Path of the corpus data directory
    pub data_dir: PathBuf,
    /// Engine under test
    pub engine: CorpusEngine,
}

impl TestHarness {
    /// Create a harness with default mocks: one section per paragraph,
    /// byte-derived embeddings of dimension 8.
    pub fn new() -> Self {
        Self::with_oracles(MockSectionOracle::new(), MockEmbedder::new(8))
    }

    /// Create a harness around specific mock oracles.
    pub fn with_oracles(oracle: MockSectionOracle, embedder: MockEmbedder) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("corpus");
        let engine = build_engine(&data_dir, oracle, embedder);

        Self {
            _temp_dir: temp_dir,
            data_dir,
            engine,
        }
    }

    /// Open a second engine over the same data directory, as a fresh
    /// session would.
    pub fn reopen(&self) -> CorpusEngine {
        build_engine(&self.data_dir, MockSectionOracle::new(), MockEmbedder::new(8))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an engine over `data_dir` with the given mock oracles.
pub fn build_engine(
    data_dir: &Path,
    oracle: MockSectionOracle,
    embedder: MockEmbedder,
) -> CorpusEngine {
    let store = SectionStore::open(data_dir).expect("Failed to open test store");
    CorpusEngine::new(
        store,
        Arc::new(oracle),
        Arc::new(embedder),
        Box::new(PlainTextExtractor),
        SegmenterConfig::default(),
    )
}

/// A small plain-text document body with the given paragraphs.
pub fn document_text(paragraphs: &[&str]) -> Vec<u8> {
    paragraphs.join("\n\n").into_bytes()
}
