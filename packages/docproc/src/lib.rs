//! Document lifecycle store with RAG-backed correction suggestions.
//!
//! Tracks ingested documents through extraction and review, and generates
//! AI correction suggestions for low-confidence fields by retrieving
//! per-document context from a vector index and prompting a text generator
//! with it.
//!
//! # Design
//!
//! - The store is the single source of truth for documents, extracted
//!   data, and suggestion responses, and enforces the lifecycle invariants
//!   (one extracted-data record per document, review routing by confidence
//!   threshold, apply-never-lowers-confidence).
//! - The engine is stateless between calls: each run reloads the extracted
//!   data, regenerates every field's suggestion, and replaces the stored
//!   response wholesale. Failures abort the run without persisting partial
//!   results, so retries are safe.
//! - Providers (embedding, vector index, text generation) sit behind
//!   traits; reference `reqwest` clients ship in [`providers`], mocks in
//!   [`testing`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docproc::{DocumentStore, MemoryStore, NewDocument, SuggestionEngine};
//! use docproc::providers::{OpenAiEmbedder, OpenAiGenerator, PineconeIndex};
//!
//! // Construct once at process start; hand the store to the HTTP layer
//! // and the engine by reference.
//! let store = Arc::new(MemoryStore::new());
//! let engine = SuggestionEngine::new(
//!     store.clone(),
//!     OpenAiEmbedder::from_env()?,
//!     PineconeIndex::from_env()?,
//!     OpenAiGenerator::from_env()?,
//! );
//!
//! let document = store
//!     .create_document(NewDocument::new("invoice.pdf", "uploads/invoice.pdf", "application/pdf"))
//!     .await?;
//! // ... extraction records fields, then:
//! let response = engine.generate_suggestions(&document.id).await?;
//! store.update_suggestion_status(&document.id, "vendor", true).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Store and provider trait abstractions
//! - [`types`] - Documents, extracted fields, suggestions, configuration
//! - [`stores`] - Storage implementations (`MemoryStore`)
//! - [`engine`] - The suggestion engine and its prompts
//! - [`providers`] - Reference provider clients (OpenAI, Pinecone)
//! - [`testing`] - Mock providers for tests

pub mod engine;
pub mod error;
pub mod providers;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{StoreError, SuggestionError, UpstreamError};
pub use traits::{
    providers::{ContextMatch, EmbeddingProvider, TextGenerator, VectorIndex},
    store::{DocumentStore, StoreResult},
};
pub use types::{
    config::{StoreConfig, SuggestionConfig},
    document::{Document, DocumentStatus, DocumentUpdate, NewDocument},
    extracted::{ExtractedData, FIELD_AMOUNT, FIELD_DATE, FIELD_INVOICE_NUMBER, FIELD_VENDOR},
    suggestion::{FieldSuggestion, SuggestionResponse},
};

// Re-export the engine and store implementations
pub use engine::{ConfidencePolicy, FixedConfidence, SuggestionEngine};
pub use stores::MemoryStore;

// Re-export provider clients
pub use providers::{OpenAiEmbedder, OpenAiGenerator, PineconeIndex};

// Re-export testing utilities
pub use testing::{MockEmbedder, MockGenerator, MockVectorIndex};
