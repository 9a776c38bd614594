//! # corpus-engine
//!
//! Facade composing the corpus-index components into the API surface
//! consumed by collaborators (the CLI, gap-analysis and recommendation
//! consumers, dashboards).
//!
//! The engine owns the [`SectionStore`] exclusively; ingestion takes
//! `&mut self` and reads take `&self`, so single-writer operation is
//! enforced by the borrow checker rather than by convention.

use std::sync::Arc;

use thiserror::Error;

use corpus_embeddings::{ApiEmbedder, ApiEmbedderConfig, Embedder};
use corpus_ingest::{IngestError, IngestPipeline, PlainTextExtractor, TextExtractor};
use corpus_network::{build_network, DocumentNetwork};
use corpus_search::{SearchError, SearchHit, SimilaritySearcher};
use corpus_segment::{
    ApiSectionOracle, ApiSectionOracleConfig, DocumentSegmenter, SectionOracle, SegmenterConfig,
};
use corpus_store::{SectionStore, StoreError};
use corpus_types::Settings;

pub use corpus_search::DEFAULT_TOP_K;

/// Errors raised while constructing an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Adapter or settings misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// The corpus-index engine.
pub struct CorpusEngine {
    store: SectionStore,
    pipeline: IngestPipeline,
    searcher: SimilaritySearcher,
}

impl CorpusEngine {
    /// Assemble an engine from injected collaborators.
    pub fn new(
        store: SectionStore,
        oracle: Arc<dyn SectionOracle>,
        embedder: Arc<dyn Embedder>,
        extractor: Box<dyn TextExtractor>,
        segmenter_config: SegmenterConfig,
    ) -> Self {
        let segmenter = DocumentSegmenter::new(oracle, segmenter_config);
        let pipeline = IngestPipeline::new(segmenter, embedder.clone(), extractor);
        let searcher = SimilaritySearcher::new(embedder);

        Self {
            store,
            pipeline,
            searcher,
        }
    }

    /// Build an engine wired to API oracles from loaded settings.
    ///
    /// Adapter configuration is validated before the store directory
    /// is touched.
    pub fn from_settings(settings: &Settings) -> Result<Self, EngineError> {
        let segmenter_key = settings.segmenter.api_key.clone().ok_or_else(|| {
            EngineError::Config("segmenter.api_key is not set".to_string())
        })?;
        let mut oracle_config = match settings.segmenter.provider.as_str() {
            "openai" => ApiSectionOracleConfig::openai(segmenter_key, &settings.segmenter.model),
            "anthropic" => ApiSectionOracleConfig::claude(segmenter_key, &settings.segmenter.model),
            other => {
                return Err(EngineError::Config(format!(
                    "unknown segmenter provider: {other}"
                )))
            }
        };
        if let Some(base_url) = &settings.segmenter.api_base_url {
            oracle_config = oracle_config.with_base_url(base_url);
        }
        let oracle =
            ApiSectionOracle::new(oracle_config).map_err(|e| EngineError::Config(e.to_string()))?;

        let embedder_key = settings.embedder.api_key.clone().ok_or_else(|| {
            EngineError::Config("embedder.api_key is not set".to_string())
        })?;
        let mut embedder_config = ApiEmbedderConfig::openai(embedder_key, &settings.embedder.model);
        if let Some(base_url) = &settings.embedder.api_base_url {
            embedder_config = embedder_config.with_base_url(base_url);
        }
        let embedder =
            ApiEmbedder::new(embedder_config).map_err(|e| EngineError::Config(e.to_string()))?;

        let store = SectionStore::open(settings.expanded_data_dir())?;

        Ok(Self::new(
            store,
            Arc::new(oracle),
            Arc::new(embedder),
            Box::new(PlainTextExtractor),
            SegmenterConfig {
                sample_paragraphs: settings.segmenter.sample_paragraphs,
            },
        ))
    }

    /// Ingest one document's raw bytes under the given filename.
    pub async fn process_document(
        &mut self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<(), IngestError> {
        self.pipeline
            .process_document(&mut self.store, bytes, filename)
            .await
    }

    /// Rank stored sections against the query text.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.searcher.search(&self.store, query, top_k).await
    }

    /// Number of ingested documents.
    pub fn document_count(&self) -> usize {
        self.store.document_count()
    }

    /// Number of sections across all documents.
    pub fn section_count(&self) -> usize {
        self.store.section_count()
    }

    /// Build the document relationship graph.
    pub fn build_network(&self) -> DocumentNetwork {
        build_network(&self.store)
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &SectionStore {
        &self.store
    }
}
