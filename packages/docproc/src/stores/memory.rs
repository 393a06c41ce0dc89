//! In-memory document store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use rand::Rng;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::store::{DocumentStore, StoreResult};
use crate::types::{
    config::StoreConfig,
    document::{Document, DocumentStatus, DocumentUpdate, NewDocument},
    extracted::ExtractedData,
    suggestion::SuggestionResponse,
};

/// In-memory storage for documents, extracted data, and suggestion
/// responses.
///
/// All three collections live behind one lock so multi-collection
/// mutations (extraction completion, suggestion application) are atomic
/// with respect to concurrent callers. Data is lost on restart; durability
/// is a backend swap, not a contract change.
pub struct MemoryStore {
    config: StoreConfig,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Keyed by document id; IndexMap keeps listing in insertion order.
    documents: IndexMap<String, Document>,

    /// Keyed by document id; at most one record per document.
    extracted: HashMap<String, ExtractedData>,

    /// Keyed by document id; overwritten on regeneration.
    suggestions: HashMap<String, SuggestionResponse>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with custom configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of tracked documents.
    pub fn document_count(&self) -> usize {
        self.inner.read().unwrap().documents.len()
    }

    /// Drop all stored data.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.documents.clear();
        inner.extracted.clear();
        inner.suggestions.clear();
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, new: NewDocument) -> StoreResult<Document> {
        new.validate()?;

        let document = Document {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            path: new.path,
            kind: new.kind,
            status: DocumentStatus::Pending,
            processed_at: Utc::now(),
            // Placeholder until extraction recomputes it from field scores.
            confidence: rand::rng().random_range(70..100u8),
        };

        let mut inner = self.inner.write().unwrap();
        inner
            .documents
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn get_document(&self, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.inner.read().unwrap().documents.get(id).cloned())
    }

    async fn list_documents(&self) -> StoreResult<Vec<Document>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .documents
            .values()
            .cloned()
            .collect())
    }

    async fn update_document(&self, id: &str, update: DocumentUpdate) -> StoreResult<Document> {
        update.validate()?;

        let mut inner = self.inner.write().unwrap();
        let Some(document) = inner.documents.get_mut(id) else {
            return Err(StoreError::DocumentNotFound { id: id.to_string() });
        };
        update.apply_to(document);
        Ok(document.clone())
    }

    async fn create_extracted_data(
        &self,
        document_id: &str,
        data: IndexMap<String, String>,
        confidence_scores: IndexMap<String, u8>,
    ) -> StoreResult<ExtractedData> {
        let record = ExtractedData::new(document_id, data, confidence_scores)?;

        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;

        let Some(document) = inner.documents.get_mut(document_id) else {
            return Err(StoreError::DocumentNotFound {
                id: document_id.to_string(),
            });
        };
        if inner.extracted.contains_key(document_id) {
            return Err(StoreError::Conflict {
                document_id: document_id.to_string(),
            });
        }

        // Extraction completes the document's lifecycle step in the same
        // atomic mutation: confidence from field scores, status from the
        // review threshold.
        let needs_review = record
            .confidence_scores
            .values()
            .any(|&score| score < self.config.review_threshold);
        document.confidence = record.overall_confidence();
        document.status = if needs_review {
            DocumentStatus::NeedsReview
        } else {
            DocumentStatus::Approved
        };
        document.processed_at = Utc::now();

        inner
            .extracted
            .insert(document_id.to_string(), record.clone());
        Ok(record)
    }

    async fn get_extracted_data(&self, document_id: &str) -> StoreResult<Option<ExtractedData>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .extracted
            .get(document_id)
            .cloned())
    }

    async fn save_suggestions(&self, response: SuggestionResponse) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .suggestions
            .insert(response.document_id.clone(), response);
        Ok(())
    }

    async fn get_suggestions(&self, document_id: &str) -> StoreResult<Option<SuggestionResponse>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .suggestions
            .get(document_id)
            .cloned())
    }

    async fn update_suggestion_status(
        &self,
        document_id: &str,
        field: &str,
        apply: bool,
    ) -> StoreResult<()> {
        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;

        let suggestion = {
            let Some(response) = inner.suggestions.get(document_id) else {
                return Err(StoreError::SuggestionsNotFound {
                    document_id: document_id.to_string(),
                });
            };
            let Some(suggestion) = response.suggestion_for(field) else {
                return Err(StoreError::SuggestionNotFound {
                    document_id: document_id.to_string(),
                    field: field.to_string(),
                });
            };
            suggestion.clone()
        };

        if !apply {
            // Declined: the suggestion stays on record, nothing changes.
            tracing::debug!(document_id, field, "suggestion declined");
            return Ok(());
        }

        let Some(extracted) = inner.extracted.get_mut(document_id) else {
            return Err(StoreError::ExtractedDataNotFound {
                document_id: document_id.to_string(),
            });
        };
        extracted.apply_correction(field, &suggestion.suggestion, suggestion.confidence)?;
        let overall = extracted.overall_confidence();

        let Some(document) = inner.documents.get_mut(document_id) else {
            return Err(StoreError::DocumentNotFound {
                id: document_id.to_string(),
            });
        };
        document.confidence = overall;

        tracing::debug!(document_id, field, confidence = overall, "suggestion applied");
        Ok(())
    }
}
