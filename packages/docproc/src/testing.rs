//! Mock providers for tests.
//!
//! Deterministic, configurable implementations of the provider traits so
//! the suggestion flow can be tested without live AI services. Exported
//! for downstream consumers' test suites as well.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::UpstreamError;
use crate::traits::providers::{ContextMatch, EmbeddingProvider, TextGenerator, VectorIndex};

/// A mock embedding provider.
///
/// Returns predefined vectors when configured, otherwise a deterministic
/// embedding seeded from a hash of the text, so retrieval tests reproduce
/// without a live provider.
#[derive(Clone)]
pub struct MockEmbedder {
    embeddings: Arc<RwLock<HashMap<String, Vec<f32>>>>,
    fail_on: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
    dimension: usize,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    /// Create a mock embedder with an 8-dimensional default embedding.
    pub fn new() -> Self {
        Self {
            embeddings: Arc::new(RwLock::new(HashMap::new())),
            fail_on: Arc::new(RwLock::new(Vec::new())),
            delay: None,
            dimension: 8,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the embedding dimension for generated vectors.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Predefine the embedding for a text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.embeddings.write().unwrap().insert(text.into(), embedding);
        self
    }

    /// Fail any call whose text contains `fragment`.
    pub fn failing_on(self, fragment: impl Into<String>) -> Self {
        self.fail_on.write().unwrap().push(fragment.into());
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Texts this mock was asked to embed, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    fn deterministic_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        (0..self.dimension)
            .map(|i| {
                let byte = hash[i % 32] as f32;
                // Normalize to [-1, 1]
                (byte / 127.5) - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        self.calls.write().unwrap().push(text.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .fail_on
            .read()
            .unwrap()
            .iter()
            .any(|fragment| text.contains(fragment))
        {
            return Err(UpstreamError::provider(
                "mock embedder",
                format!("configured failure for: {text}"),
            ));
        }

        Ok(self
            .embeddings
            .read()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.deterministic_embedding(text)))
    }
}

/// A mock vector index holding chunks per document id.
///
/// Queries only ever see the chunks registered for the queried document,
/// matching the scoping contract of real indexes.
#[derive(Clone, Default)]
pub struct MockVectorIndex {
    chunks: Arc<RwLock<HashMap<String, Vec<ContextMatch>>>>,
    fail: Arc<RwLock<bool>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<(String, usize)>>>,
}

impl MockVectorIndex {
    /// Create an empty mock index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chunk with a text payload for a document.
    pub fn with_chunk(
        self,
        document_id: impl Into<String>,
        score: f32,
        text: impl Into<String>,
    ) -> Self {
        self.chunks
            .write()
            .unwrap()
            .entry(document_id.into())
            .or_default()
            .push(ContextMatch::new(score, text));
        self
    }

    /// Register a chunk without a text payload.
    pub fn with_payloadless_chunk(self, document_id: impl Into<String>, score: f32) -> Self {
        self.chunks
            .write()
            .unwrap()
            .entry(document_id.into())
            .or_default()
            .push(ContextMatch::without_text(score));
        self
    }

    /// Fail every query.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap() = true;
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// (document_id, top_k) pairs this mock was queried with.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn query(
        &self,
        _vector: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<ContextMatch>, UpstreamError> {
        self.calls
            .write()
            .unwrap()
            .push((document_id.to_string(), top_k));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail.read().unwrap() {
            return Err(UpstreamError::provider("mock index", "configured failure"));
        }

        let mut matches = self
            .chunks
            .read()
            .unwrap()
            .get(document_id)
            .cloned()
            .unwrap_or_default();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }
}

/// A mock text generator with canned responses keyed by prompt fragment.
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<RwLock<Vec<(String, String)>>>,
    fail_on: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockGenerator {
    /// Create a mock generator that answers "No correction needed." unless
    /// configured otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `response` for any prompt containing `fragment`. Fragments
    /// are matched in registration order; the first hit wins.
    pub fn with_response(
        self,
        fragment: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((fragment.into(), response.into()));
        self
    }

    /// Fail any call whose prompt contains `fragment`.
    pub fn failing_on(self, fragment: impl Into<String>) -> Self {
        self.fail_on.write().unwrap().push(fragment.into());
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts this mock received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if prompt.trim().is_empty() {
            return Err(UpstreamError::EmptyPrompt);
        }
        if self
            .fail_on
            .read()
            .unwrap()
            .iter()
            .any(|fragment| prompt.contains(fragment))
        {
            return Err(UpstreamError::provider(
                "mock generator",
                "configured failure",
            ));
        }

        Ok(self
            .responses
            .read()
            .unwrap()
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| "No correction needed.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_embedding_is_stable() {
        let embedder = MockEmbedder::new().with_dimension(16);
        let a = embedder.embed("vendor Acme").await.unwrap();
        let b = embedder.embed("vendor Acme").await.unwrap();
        let c = embedder.embed("amount 42").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        assert_eq!(embedder.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_index_scopes_and_ranks() {
        let index = MockVectorIndex::new()
            .with_chunk("d1", 0.5, "second")
            .with_chunk("d1", 0.9, "first")
            .with_chunk("d2", 0.99, "other document");

        let matches = index.query(&[0.0], "d1", 3).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text.as_deref(), Some("first"));

        let matches = index.query(&[0.0], "d1", 1).await.unwrap();
        assert_eq!(matches.len(), 1);

        let matches = index.query(&[0.0], "d3", 3).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_generator_canned_responses_and_empty_prompt() {
        let generator = MockGenerator::new().with_response("vendor", "Acme Corp Inc.");

        let canned = generator.generate("fix the vendor field").await.unwrap();
        assert_eq!(canned, "Acme Corp Inc.");

        let fallback = generator.generate("fix the amount field").await.unwrap();
        assert_eq!(fallback, "No correction needed.");

        let empty = generator.generate("  ").await;
        assert!(matches!(empty, Err(UpstreamError::EmptyPrompt)));
    }
}
