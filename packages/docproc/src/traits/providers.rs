//! Provider traits for the retrieval-augmented suggestion flow.
//!
//! Embedding, vector search, and text generation are external network
//! services. The engine consumes them through these traits so tests and
//! alternative providers can be swapped in without touching the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Turns text into a fixed-length embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single query string. The vector length is fixed by the
    /// provider.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError>;
}

/// A single match returned from a vector index query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMatch {
    /// Similarity score as reported by the index.
    pub score: f32,

    /// Text payload of the matched chunk, if the index stored one.
    pub text: Option<String>,
}

impl ContextMatch {
    /// Create a match with a text payload.
    pub fn new(score: f32, text: impl Into<String>) -> Self {
        Self {
            score,
            text: Some(text.into()),
        }
    }

    /// Create a match without a text payload.
    pub fn without_text(score: f32) -> Self {
        Self { score, text: None }
    }
}

/// Nearest-neighbour search over embedding vectors, scoped by document.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches for `vector`, restricted to chunks
    /// belonging to `document_id`, best match first. An empty result is
    /// valid, not an error.
    ///
    /// Implementations must enforce the document filter; a chunk from
    /// another document leaking into the result is a correctness violation,
    /// not a ranking nuance.
    async fn query(
        &self,
        vector: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<ContextMatch>, UpstreamError>;
}

/// Turns a prompt into a free-text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt. Fails with
    /// [`UpstreamError::EmptyPrompt`] when the prompt is empty.
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_match_constructors() {
        let with_text = ContextMatch::new(0.9, "Acme Corp Inc.");
        assert_eq!(with_text.text.as_deref(), Some("Acme Corp Inc."));

        let bare = ContextMatch::without_text(0.4);
        assert!(bare.text.is_none());
    }
}
