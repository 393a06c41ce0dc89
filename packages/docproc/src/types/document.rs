//! Document identity and lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Lifecycle status of a document.
///
/// Store-driven transitions move forward only:
/// `Pending` → `Processed` → `NeedsReview` or `Approved`. `Approved` and
/// `Rejected` are otherwise external decisions recorded through
/// document updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentStatus {
    Pending,
    Processed,
    NeedsReview,
    Approved,
    Rejected,
}

/// A tracked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Opaque unique id (UUIDv4).
    pub id: String,

    /// Original file name.
    pub name: String,

    /// Storage location, opaque to this crate.
    pub path: String,

    /// MIME type or category.
    #[serde(rename = "type")]
    pub kind: String,

    /// Lifecycle status.
    pub status: DocumentStatus,

    /// When the document was last processed.
    pub processed_at: DateTime<Utc>,

    /// Overall confidence, 0-100. Seeded on ingestion, recomputed from
    /// field scores once extraction lands.
    pub confidence: u8,
}

/// Input for registering a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NewDocument {
    /// Create a new-document request.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// Reject empty required fields.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("document name must not be empty"));
        }
        if self.path.trim().is_empty() {
            return Err(StoreError::validation("document path must not be empty"));
        }
        if self.kind.trim().is_empty() {
            return Err(StoreError::validation("document type must not be empty"));
        }
        Ok(())
    }
}

/// Partial update merged into an existing document.
///
/// Only the set fields change; everything else keeps its current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<DocumentStatus>,
    pub processed_at: Option<DateTime<Utc>>,
    pub confidence: Option<u8>,
}

impl DocumentUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the storage path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the type.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the processed-at timestamp.
    pub fn with_processed_at(mut self, processed_at: DateTime<Utc>) -> Self {
        self.processed_at = Some(processed_at);
        self
    }

    /// Set the overall confidence.
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(confidence) = self.confidence {
            if confidence > 100 {
                return Err(StoreError::validation(format!(
                    "confidence {confidence} exceeds 100"
                )));
            }
        }
        Ok(())
    }

    /// Merge the set fields into `document`.
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(name) = &self.name {
            document.name = name.clone();
        }
        if let Some(path) = &self.path {
            document.path = path.clone();
        }
        if let Some(kind) = &self.kind {
            document.kind = kind.clone();
        }
        if let Some(status) = self.status {
            document.status = status;
        }
        if let Some(processed_at) = self.processed_at {
            document.processed_at = processed_at;
        }
        if let Some(confidence) = self.confidence {
            document.confidence = confidence;
        }
    }
}
