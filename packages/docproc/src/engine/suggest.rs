//! Retrieval-augmented suggestion generation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::prompts::{build_field_query, format_correction_prompt};
use crate::error::{StoreError, SuggestionError, UpstreamError};
use crate::traits::providers::{ContextMatch, EmbeddingProvider, TextGenerator, VectorIndex};
use crate::traits::store::DocumentStore;
use crate::types::{
    config::SuggestionConfig,
    suggestion::{FieldSuggestion, SuggestionResponse},
};

/// Reason recorded on every suggestion the engine produces.
const RAG_REASON: &str = "Based on document context retrieved via RAG";

/// Assigns a confidence score to a generated suggestion.
///
/// The generator returns plain text with no calibrated signal, so scoring
/// is a policy the application chooses rather than a property of the
/// pipeline.
pub trait ConfidencePolicy: Send + Sync {
    /// Score a suggestion for `field`, given the retrieval matches that
    /// informed it.
    fn score(
        &self,
        field: &str,
        current_value: &str,
        suggestion: &str,
        matches: &[ContextMatch],
    ) -> u8;
}

/// Constant confidence for every suggestion.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(pub u8);

impl Default for FixedConfidence {
    fn default() -> Self {
        Self(90)
    }
}

impl ConfidencePolicy for FixedConfidence {
    fn score(&self, _field: &str, _current: &str, _suggestion: &str, _matches: &[ContextMatch]) -> u8 {
        self.0
    }
}

/// Produces correction suggestions for a document's extracted fields via
/// retrieval-augmented generation.
///
/// The engine holds no state between calls: every invocation reloads the
/// extracted data, recomputes the full suggestion set, and hands it to the
/// store, replacing any prior response for the document. A failure on any
/// field aborts the whole call and persists nothing, so callers can retry
/// the operation wholesale.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let engine = SuggestionEngine::new(
///     store.clone(),
///     OpenAiEmbedder::from_env()?,
///     PineconeIndex::from_env()?,
///     OpenAiGenerator::from_env()?,
/// );
///
/// let response = engine.generate_suggestions(&document_id).await?;
/// ```
pub struct SuggestionEngine<S, E, V, G> {
    store: Arc<S>,
    embedder: E,
    index: V,
    generator: G,
    config: SuggestionConfig,
    policy: Box<dyn ConfidencePolicy>,
}

impl<S, E, V, G> SuggestionEngine<S, E, V, G>
where
    S: DocumentStore,
    E: EmbeddingProvider,
    V: VectorIndex,
    G: TextGenerator,
{
    /// Create an engine with default configuration and fixed confidence.
    pub fn new(store: Arc<S>, embedder: E, index: V, generator: G) -> Self {
        Self {
            store,
            embedder,
            index,
            generator,
            config: SuggestionConfig::default(),
            policy: Box::new(FixedConfidence::default()),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SuggestionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the confidence policy.
    pub fn with_confidence_policy(mut self, policy: impl ConfidencePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Generate a fresh suggestion set for every extracted field of a
    /// document and persist it, replacing any prior response.
    ///
    /// Fields are processed concurrently up to the configured cap, but the
    /// returned suggestions always follow the extracted data's field order.
    /// Fails with [`StoreError::ExtractedDataNotFound`] when the document
    /// has no extracted data, or with [`SuggestionError::Upstream`] when
    /// any provider call fails or times out; in either case the previously
    /// stored response, if any, is left untouched.
    pub async fn generate_suggestions(
        &self,
        document_id: &str,
    ) -> Result<SuggestionResponse, SuggestionError> {
        let extracted = self
            .store
            .get_extracted_data(document_id)
            .await?
            .ok_or_else(|| StoreError::ExtractedDataNotFound {
                document_id: document_id.to_string(),
            })?;

        info!(
            document_id,
            fields = extracted.data.len(),
            "generating suggestions"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let tasks = extracted.data.iter().map(|(field, value)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await.unwrap();
                self.suggest_field(document_id, field, value).await
            }
        });

        // try_join_all keeps the input order, so the response lines up with
        // the field order no matter which call finishes first. The first
        // error cancels the remaining in-flight fields.
        let suggestions = futures::future::try_join_all(tasks).await.map_err(|err| {
            warn!(document_id, error = %err, "suggestion generation aborted");
            err
        })?;

        let response = SuggestionResponse {
            document_id: document_id.to_string(),
            suggestions,
        };
        self.store.save_suggestions(response.clone()).await?;

        info!(
            document_id,
            suggestions = response.len(),
            "suggestions persisted"
        );
        Ok(response)
    }

    /// Like [`generate_suggestions`](Self::generate_suggestions), but
    /// abandons the run when `cancel` fires. Nothing is persisted on
    /// cancellation.
    pub async fn generate_with_cancel(
        &self,
        document_id: &str,
        cancel: CancellationToken,
    ) -> Result<SuggestionResponse, SuggestionError> {
        tokio::select! {
            result = self.generate_suggestions(document_id) => result,
            _ = cancel.cancelled() => Err(SuggestionError::Cancelled),
        }
    }

    /// Retrieve context for one field and generate its suggestion.
    async fn suggest_field(
        &self,
        document_id: &str,
        field: &str,
        current_value: &str,
    ) -> Result<FieldSuggestion, SuggestionError> {
        let query = build_field_query(field, current_value);
        debug!(document_id, field, "retrieving context");

        let vector = self
            .bounded("embedding provider", field, self.embedder.embed(&query))
            .await?;
        let matches = self
            .bounded(
                "vector index",
                field,
                self.index.query(&vector, document_id, self.config.top_k),
            )
            .await?;

        // One chunk per line, ranking order preserved; a chunk without a
        // text payload contributes an empty line.
        let context = matches
            .iter()
            .map(|m| m.text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format_correction_prompt(field, current_value, &context);
        let suggestion = self
            .bounded("text generator", field, self.generator.generate(&prompt))
            .await?;

        let confidence = self.policy.score(field, current_value, &suggestion, &matches);
        Ok(FieldSuggestion {
            field: field.to_string(),
            current_value: current_value.to_string(),
            suggestion,
            confidence,
            reason: RAG_REASON.to_string(),
        })
    }

    /// Apply the configured deadline to one upstream call and tag any
    /// failure with the field it belongs to.
    async fn bounded<T>(
        &self,
        provider: &'static str,
        field: &str,
        call: impl Future<Output = Result<T, UpstreamError>>,
    ) -> Result<T, SuggestionError> {
        let deadline = self.config.upstream_timeout;
        let outcome = match timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                provider,
                elapsed: deadline,
            }),
        };
        outcome.map_err(|source| SuggestionError::Upstream {
            field: field.to_string(),
            source,
        })
    }
}
