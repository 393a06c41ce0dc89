//! Data model for documents, extracted fields, and suggestions.

pub mod config;
pub mod document;
pub mod extracted;
pub mod suggestion;
