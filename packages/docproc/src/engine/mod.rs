//! The suggestion engine.
//!
//! Orchestrates per-field retrieval and generation:
//! - build a retrieval query from the field and its current value
//! - embed the query and search the document-scoped vector index
//! - assemble the retrieved chunks into a generation prompt
//! - generate a correction and score it with the confidence policy
//! - persist the full, ordered response through the document store

pub mod prompts;
pub mod suggest;

pub use prompts::{build_field_query, format_correction_prompt, CORRECTION_PROMPT};
pub use suggest::{ConfidencePolicy, FixedConfidence, SuggestionEngine};
