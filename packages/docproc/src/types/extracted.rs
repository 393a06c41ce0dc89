//! Extracted field records with per-field confidence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Canonical invoice fields produced by the extraction pipeline.
pub const FIELD_DATE: &str = "date";
pub const FIELD_INVOICE_NUMBER: &str = "invoiceNumber";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_VENDOR: &str = "vendor";

/// Structured fields extracted from a document, with a parallel confidence
/// score per field.
///
/// Both records are ordered maps; their insertion order is the field
/// iteration order the suggestion pipeline and response ordering follow.
/// Construction validates that the two records cover exactly the same
/// field names, so a score can never go missing for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    /// Opaque unique id (UUIDv4).
    pub id: String,

    /// The document this record belongs to (weak reference).
    pub document_id: String,

    /// Field name → extracted value.
    pub data: IndexMap<String, String>,

    /// Field name → confidence 0-100.
    pub confidence_scores: IndexMap<String, u8>,
}

impl ExtractedData {
    /// Build a validated record with a fresh id.
    pub fn new(
        document_id: impl Into<String>,
        data: IndexMap<String, String>,
        confidence_scores: IndexMap<String, u8>,
    ) -> Result<Self, StoreError> {
        for field in data.keys() {
            if !confidence_scores.contains_key(field) {
                return Err(StoreError::validation(format!(
                    "field {field} has no confidence score"
                )));
            }
        }
        for field in confidence_scores.keys() {
            if !data.contains_key(field) {
                return Err(StoreError::validation(format!(
                    "confidence score for unknown field {field}"
                )));
            }
        }
        for (field, score) in &confidence_scores {
            if *score > 100 {
                return Err(StoreError::validation(format!(
                    "confidence score {score} for field {field} exceeds 100"
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.into(),
            data,
            confidence_scores,
        })
    }

    /// Iterate (field, value) pairs in record order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Confidence score for a field, if the field exists.
    pub fn confidence_for(&self, field: &str) -> Option<u8> {
        self.confidence_scores.get(field).copied()
    }

    /// Floor-mean of the field confidence scores; 0 for an empty record.
    pub fn overall_confidence(&self) -> u8 {
        if self.confidence_scores.is_empty() {
            return 0;
        }
        let sum: u32 = self.confidence_scores.values().map(|&s| u32::from(s)).sum();
        (sum / self.confidence_scores.len() as u32) as u8
    }

    /// Write a corrected value into a field and raise its confidence to
    /// `confidence` (never lowered below the current score).
    pub fn apply_correction(
        &mut self,
        field: &str,
        value: &str,
        confidence: u8,
    ) -> Result<(), StoreError> {
        let Some(current_value) = self.data.get_mut(field) else {
            return Err(StoreError::validation(format!(
                "field {field} not present in extracted data"
            )));
        };
        *current_value = value.to_string();

        let score = self
            .confidence_scores
            .get_mut(field)
            .expect("score exists for every data field");
        *score = (*score).max(confidence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_record() -> ExtractedData {
        let mut data = IndexMap::new();
        data.insert(FIELD_DATE.to_string(), "2024-03-01".to_string());
        data.insert(FIELD_VENDOR.to_string(), "Acme".to_string());

        let mut scores = IndexMap::new();
        scores.insert(FIELD_DATE.to_string(), 95);
        scores.insert(FIELD_VENDOR.to_string(), 60);

        ExtractedData::new("doc-1", data, scores).unwrap()
    }

    #[test]
    fn test_rejects_field_without_score() {
        let mut data = IndexMap::new();
        data.insert("vendor".to_string(), "Acme".to_string());

        let result = ExtractedData::new("doc-1", data, IndexMap::new());
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_rejects_score_without_field() {
        let mut scores = IndexMap::new();
        scores.insert("vendor".to_string(), 80);

        let result = ExtractedData::new("doc-1", IndexMap::new(), scores);
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_rejects_score_over_100() {
        let mut data = IndexMap::new();
        data.insert("vendor".to_string(), "Acme".to_string());
        let mut scores = IndexMap::new();
        scores.insert("vendor".to_string(), 101);

        let result = ExtractedData::new("doc-1", data, scores);
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_fields_iterate_in_insertion_order() {
        let record = invoice_record();
        let names: Vec<&str> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec![FIELD_DATE, FIELD_VENDOR]);
    }

    #[test]
    fn test_overall_confidence_floors_the_mean() {
        let record = invoice_record();
        // (95 + 60) / 2 = 77.5, floored
        assert_eq!(record.overall_confidence(), 77);
    }

    #[test]
    fn test_apply_correction_updates_value_and_raises_score() {
        let mut record = invoice_record();
        record
            .apply_correction(FIELD_VENDOR, "Acme Corp Inc.", 90)
            .unwrap();

        assert_eq!(record.data[FIELD_VENDOR], "Acme Corp Inc.");
        assert_eq!(record.confidence_for(FIELD_VENDOR), Some(90));
    }

    #[test]
    fn test_apply_correction_never_lowers_score() {
        let mut record = invoice_record();
        record
            .apply_correction(FIELD_DATE, "2024-03-02", 50)
            .unwrap();

        assert_eq!(record.data[FIELD_DATE], "2024-03-02");
        assert_eq!(record.confidence_for(FIELD_DATE), Some(95));
    }

    #[test]
    fn test_apply_correction_unknown_field() {
        let mut record = invoice_record();
        let result = record.apply_correction("total", "42", 90);
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(invoice_record()).unwrap();
        assert!(value.get("documentId").is_some());
        assert!(value.get("confidenceScores").is_some());
    }
}
