//! Typed errors for the document store and suggestion engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the HTTP layer can
//! map each class to a status code without string matching.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input (empty required field, mismatched field records,
    /// out-of-range confidence).
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// No document with the given id.
    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    /// No extracted data recorded for the document.
    #[error("extracted data not found for document {document_id}")]
    ExtractedDataNotFound { document_id: String },

    /// No suggestion response recorded for the document.
    #[error("no suggestions stored for document {document_id}")]
    SuggestionsNotFound { document_id: String },

    /// The stored suggestion response has no entry for the field.
    #[error("no suggestion for field {field} on document {document_id}")]
    SuggestionNotFound { document_id: String, field: String },

    /// Extracted data already exists for the document.
    #[error("extracted data already exists for document {document_id}")]
    Conflict { document_id: String },

    /// Backing store failure. Unused by the in-memory store; durable
    /// implementations surface their I/O errors here.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Errors raised by upstream AI providers (embedding, vector index,
/// text generation).
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider did not answer within the configured deadline.
    #[error("{provider} call timed out after {elapsed:?}")]
    Timeout {
        provider: &'static str,
        elapsed: Duration,
    },

    /// The provider answered with an error or an unusable response.
    #[error("{provider} call failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The generation prompt was empty.
    #[error("empty prompt")]
    EmptyPrompt,
}

impl UpstreamError {
    /// Wrap a provider failure with its provider tag.
    pub fn provider(
        provider: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Provider {
            provider,
            source: source.into(),
        }
    }

    /// True when the failure was a deadline elapse.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors raised while generating a suggestion set for a document.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// Reading or persisting through the document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An upstream provider failed while processing one field. The whole
    /// generation aborts; no partial response is persisted.
    #[error("upstream failure for field {field}: {source}")]
    Upstream {
        field: String,
        #[source]
        source: UpstreamError,
    },

    /// The caller cancelled the generation before it completed.
    #[error("suggestion generation cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = StoreError::DocumentNotFound { id: "d1".into() };
        assert!(err.to_string().contains("d1"));

        let err = StoreError::Conflict {
            document_id: "d2".into(),
        };
        assert!(err.to_string().contains("d2"));

        let err = SuggestionError::Upstream {
            field: "vendor".into(),
            source: UpstreamError::EmptyPrompt,
        };
        assert!(err.to_string().contains("vendor"));
    }

    #[test]
    fn test_timeout_predicate() {
        let err = UpstreamError::Timeout {
            provider: "embedding",
            elapsed: Duration::from_secs(30),
        };
        assert!(err.is_timeout());
        assert!(!UpstreamError::EmptyPrompt.is_timeout());
    }
}
