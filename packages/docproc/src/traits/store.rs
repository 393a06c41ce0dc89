//! Repository trait for documents, extracted data, and suggestion responses.
//!
//! The store is the single source of truth for all three collections. It is
//! an explicit trait (rather than bare maps) so the in-memory backend can be
//! swapped for a durable one without changing the engine or the HTTP layer.

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::StoreError;
use crate::types::{
    document::{Document, DocumentUpdate, NewDocument},
    extracted::ExtractedData,
    suggestion::SuggestionResponse,
};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Authoritative storage and lifecycle transitions for documents.
///
/// Lookups return `Option` (absence is not an error at this surface; the
/// HTTP layer maps `None` to 404). Mutating operations report missing
/// targets as [`StoreError`] variants.
///
/// All mutating operations are atomic with respect to concurrent callers
/// for the same key: two concurrent [`create_extracted_data`] calls for one
/// document yield exactly one success and one [`StoreError::Conflict`].
///
/// [`create_extracted_data`]: DocumentStore::create_extracted_data
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Register a newly ingested document.
    ///
    /// The document starts as `Pending` with a placeholder confidence in
    /// [70,100) until extraction lands. Fails with
    /// [`StoreError::Validation`] when name, path, or type is empty.
    async fn create_document(&self, new: NewDocument) -> StoreResult<Document>;

    /// Fetch a document by id.
    async fn get_document(&self, id: &str) -> StoreResult<Option<Document>>;

    /// All documents, in insertion order.
    async fn list_documents(&self) -> StoreResult<Vec<Document>>;

    /// Merge the set fields of `update` into an existing document and
    /// return the result. This is the explicit external-override path of
    /// the status machine (e.g. a reviewer rejecting a document).
    async fn update_document(&self, id: &str, update: DocumentUpdate) -> StoreResult<Document>;

    /// Record extraction output for a document.
    ///
    /// At most one extracted-data record may exist per document; a second
    /// call fails with [`StoreError::Conflict`]. On success the document's
    /// lifecycle advances in the same atomic step: its confidence becomes
    /// the floor-mean of the field scores and its status becomes
    /// `NeedsReview` when any field score is below the review threshold,
    /// `Approved` otherwise.
    async fn create_extracted_data(
        &self,
        document_id: &str,
        data: IndexMap<String, String>,
        confidence_scores: IndexMap<String, u8>,
    ) -> StoreResult<ExtractedData>;

    /// Fetch the extracted data recorded for a document.
    async fn get_extracted_data(&self, document_id: &str) -> StoreResult<Option<ExtractedData>>;

    /// Persist a suggestion response, replacing any prior response for the
    /// same document.
    async fn save_suggestions(&self, response: SuggestionResponse) -> StoreResult<()>;

    /// Fetch the last persisted suggestion response for a document.
    async fn get_suggestions(&self, document_id: &str) -> StoreResult<Option<SuggestionResponse>>;

    /// Apply or decline one suggestion, addressed by (document id, field).
    ///
    /// When `apply` is true the suggestion text is written into the
    /// extracted data, the field's confidence is raised to the suggestion's
    /// confidence (never lowered), and the document's overall confidence is
    /// recomputed as the floor-mean of the field scores. When `apply` is
    /// false nothing changes; the suggestion stays on record, unapplied.
    async fn update_suggestion_status(
        &self,
        document_id: &str,
        field: &str,
        apply: bool,
    ) -> StoreResult<()>;
}
