//! AI correction suggestions.

use serde::{Deserialize, Serialize};

/// A proposed correction for one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSuggestion {
    /// Field name this suggestion targets; always one of the fields of the
    /// document's extracted data.
    pub field: String,

    /// The field's value at generation time.
    pub current_value: String,

    /// Proposed replacement text.
    pub suggestion: String,

    /// Confidence in the suggestion, 0-100.
    pub confidence: u8,

    /// Provenance of the suggestion (retrieval basis).
    pub reason: String,
}

/// A full suggestion set for one document, one suggestion per extracted
/// field, in the extracted data's field order.
///
/// Ephemeral per generation: regenerating replaces the stored response
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub document_id: String,
    pub suggestions: Vec<FieldSuggestion>,
}

impl SuggestionResponse {
    /// Create an empty response for a document.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            suggestions: Vec::new(),
        }
    }

    /// Find the suggestion for a field.
    pub fn suggestion_for(&self, field: &str) -> Option<&FieldSuggestion> {
        self.suggestions.iter().find(|s| s.field == field)
    }

    /// Number of suggestions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// True when the response holds no suggestions.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_lookup_by_field() {
        let mut response = SuggestionResponse::new("doc-1");
        response.suggestions.push(FieldSuggestion {
            field: "vendor".into(),
            current_value: "Acme".into(),
            suggestion: "Acme Corp Inc.".into(),
            confidence: 90,
            reason: "retrieved context".into(),
        });

        assert!(response.suggestion_for("vendor").is_some());
        assert!(response.suggestion_for("amount").is_none());
        assert_eq!(response.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let response = SuggestionResponse::new("doc-1");
        let value = serde_json::to_value(response).unwrap();
        assert!(value.get("documentId").is_some());
        assert!(value.get("suggestions").is_some());
    }
}
