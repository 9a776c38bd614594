//! Exhaustive cosine-similarity ranking over the stored corpus.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use corpus_embeddings::{cosine_similarity, Embedder, EmbeddingError};
use corpus_store::SectionStore;

/// Default number of results returned to callers that do not specify one.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum characters of section content returned in a result.
pub const SNIPPET_CHARS: usize = 300;

/// Errors that can occur during a search.
///
/// An empty corpus is NOT an error; it returns an empty result list.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query could not be embedded
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// One ranked search result with presentation-ready metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Section id
    pub id: String,

    /// Owning document's filename, or "Unknown" if the document is missing
    pub document: String,

    /// Section title
    pub section: String,

    /// First 300 characters of content, with a trailing marker if truncated
    pub content: String,

    /// Cosine similarity score
    pub score: f32,

    /// Section title (duplicated for consumers keyed on `title`)
    pub title: String,
}

/// Ranks stored sections against query text.
pub struct SimilaritySearcher {
    embedder: Arc<dyn Embedder>,
}

impl SimilaritySearcher {
    /// Create a searcher around the given embedding oracle.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Return the `top_k` most similar sections, scored descending.
    ///
    /// Ties are broken toward the earlier insertion index, so rankings
    /// are deterministic. Result length is always
    /// `min(top_k, section_count)`.
    pub async fn search(
        &self,
        store: &SectionStore,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let query_embedding = self.embedder.embed(query).await?;

        if store.section_count() == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = store
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| {
                (
                    i,
                    cosine_similarity(&query_embedding.values, &record.embedding.values),
                )
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        debug!(
            corpus = store.section_count(),
            returned = scored.len(),
            "Ranked sections for query"
        );

        let hits = scored
            .into_iter()
            .map(|(i, score)| {
                let record = &store.records()[i];
                let document = store
                    .document_by_id(&record.section.document_id)
                    .map(|d| d.filename.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                SearchHit {
                    id: record.section.section_id.clone(),
                    document,
                    section: record.section.title.clone(),
                    content: snippet(&record.section.content, SNIPPET_CHARS),
                    score,
                    title: record.section.title.clone(),
                }
            })
            .collect();

        Ok(hits)
    }
}

/// First `max_chars` characters of `content`, with a trailing "..."
/// marker when anything was cut. Shorter content is returned unchanged.
pub fn snippet(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
