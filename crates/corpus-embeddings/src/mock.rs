//! Mock embedder for testing.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::embedder::{Embedder, EmbeddingError};
use crate::embedding::{truncate_chars, Embedding, MAX_EMBED_CHARS};

/// Mock embedder that generates deterministic vectors.
///
/// Useful for testing without making API calls. Texts registered via
/// [`MockEmbedder::with_vector`] return their fixed vector; everything
/// else gets a vector derived deterministically from its bytes.
pub struct MockEmbedder {
    dimension: usize,
    fixed: HashMap<String, Vec<f32>>,
    fail: bool,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: HashMap::new(),
            fail: false,
        }
    }

    /// Register a fixed vector for an exact input text.
    pub fn with_vector(mut self, text: impl Into<String>, values: Vec<f32>) -> Self {
        self.fixed.insert(text.into(), values);
        self
    }

    /// Create a mock embedder whose every call fails.
    pub fn failing() -> Self {
        Self {
            dimension: 0,
            fixed: HashMap::new(),
            fail: true,
        }
    }

    fn derive(&self, text: &str) -> Vec<f32> {
        let mut values = vec![0.0f32; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            values[i % self.dimension] += f32::from(byte) / 255.0;
        }
        values
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::ApiError(
                "mock embedder configured to fail".to_string(),
            ));
        }

        let input = truncate_chars(text, MAX_EMBED_CHARS);

        if let Some(values) = self.fixed.get(input) {
            return Ok(Embedding::new(values.clone()));
        }

        Ok(Embedding::new(self.derive(input)))
    }
}
