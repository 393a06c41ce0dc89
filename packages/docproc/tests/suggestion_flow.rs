//! End-to-end flow: ingest a document, record extraction, generate
//! suggestions, apply one, and watch the document's state follow.

use std::sync::Arc;

use indexmap::IndexMap;
use proptest::prelude::*;

use docproc::testing::{MockEmbedder, MockGenerator, MockVectorIndex};
use docproc::{
    DocumentStatus, DocumentStore, DocumentUpdate, MemoryStore, NewDocument, SuggestionEngine,
    SuggestionError,
};

fn invoice() -> NewDocument {
    NewDocument::new("invoice.pdf", "uploads/invoice.pdf", "application/pdf")
}

fn fields(entries: &[(&str, &str, u8)]) -> (IndexMap<String, String>, IndexMap<String, u8>) {
    let mut data = IndexMap::new();
    let mut scores = IndexMap::new();
    for (field, value, score) in entries {
        data.insert(field.to_string(), value.to_string());
        scores.insert(field.to_string(), *score);
    }
    (data, scores)
}

#[tokio::test]
async fn vendor_correction_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let document = store.create_document(invoice()).await.unwrap();
    let (data, scores) = fields(&[("vendor", "Acme", 60)]);
    store
        .create_extracted_data(&document.id, data, scores)
        .await
        .unwrap();

    let index = MockVectorIndex::new().with_chunk(&document.id, 0.92, "Acme Corp Inc.");
    let generator = MockGenerator::new().with_response("field vendor", "Acme Corp Inc.");
    let engine = SuggestionEngine::new(store.clone(), MockEmbedder::new(), index, generator);

    let response = engine.generate_suggestions(&document.id).await.unwrap();
    assert_eq!(response.suggestions.len(), 1);
    let suggestion = &response.suggestions[0];
    assert_eq!(suggestion.field, "vendor");
    assert_eq!(suggestion.current_value, "Acme");
    assert_eq!(suggestion.suggestion, "Acme Corp Inc.");
    assert_eq!(suggestion.confidence, 90);

    store
        .update_suggestion_status(&document.id, "vendor", true)
        .await
        .unwrap();

    let extracted = store
        .get_extracted_data(&document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(extracted.data["vendor"], "Acme Corp Inc.");
    assert_eq!(extracted.confidence_for("vendor"), Some(90));

    let document = store.get_document(&document.id).await.unwrap().unwrap();
    assert_eq!(document.confidence, 90);
}

#[tokio::test]
async fn full_lifecycle_from_ingestion_to_review() {
    let store = Arc::new(MemoryStore::new());

    // Ingestion: pending with a placeholder confidence.
    let document = store.create_document(invoice()).await.unwrap();
    assert_eq!(document.status, DocumentStatus::Pending);
    assert!((70..100).contains(&document.confidence));

    // Extraction: one weak field routes the document to review.
    let (data, scores) = fields(&[
        ("date", "2024-03-01", 95),
        ("invoiceNumber", "INV-1", 92),
        ("amount", "120.00", 88),
        ("vendor", "Acme", 55),
    ]);
    store
        .create_extracted_data(&document.id, data, scores)
        .await
        .unwrap();
    let current = store.get_document(&document.id).await.unwrap().unwrap();
    assert_eq!(current.status, DocumentStatus::NeedsReview);

    // Suggestions cover every field, in field order.
    let engine = SuggestionEngine::new(
        store.clone(),
        MockEmbedder::new(),
        MockVectorIndex::new().with_chunk(&document.id, 0.9, "Acme Corp Inc."),
        MockGenerator::new().with_response("field vendor", "Acme Corp Inc."),
    );
    let response = engine.generate_suggestions(&document.id).await.unwrap();
    assert_eq!(
        response
            .suggestions
            .iter()
            .map(|s| s.field.as_str())
            .collect::<Vec<_>>(),
        vec!["date", "invoiceNumber", "amount", "vendor"]
    );

    // The persisted response is exactly what the engine returned.
    let stored = store.get_suggestions(&document.id).await.unwrap().unwrap();
    assert_eq!(stored, response);

    // Applying the weak field's suggestion lifts the document's confidence.
    store
        .update_suggestion_status(&document.id, "vendor", true)
        .await
        .unwrap();
    let current = store.get_document(&document.id).await.unwrap().unwrap();
    // (95 + 92 + 88 + 90) / 4 floored
    assert_eq!(current.confidence, 91);

    // Final approval is an explicit external decision.
    let approved = store
        .update_document(
            &document.id,
            DocumentUpdate::new().with_status(DocumentStatus::Approved),
        )
        .await
        .unwrap();
    assert_eq!(approved.status, DocumentStatus::Approved);
}

#[tokio::test]
async fn failed_generation_leaves_no_trace() {
    let store = Arc::new(MemoryStore::new());
    let document = store.create_document(invoice()).await.unwrap();
    let (data, scores) = fields(&[("date", "2024-03-01", 95), ("vendor", "Acme", 60)]);
    store
        .create_extracted_data(&document.id, data, scores)
        .await
        .unwrap();

    let engine = SuggestionEngine::new(
        store.clone(),
        MockEmbedder::new().failing_on("vendor"),
        MockVectorIndex::new(),
        MockGenerator::new(),
    );

    let result = engine.generate_suggestions(&document.id).await;
    assert!(matches!(result, Err(SuggestionError::Upstream { .. })));
    assert!(store.get_suggestions(&document.id).await.unwrap().is_none());
}

proptest! {
    // Whatever the field record looks like, the suggestion sequence matches
    // its length and order exactly.
    #[test]
    fn suggestions_always_match_field_order(
        entries in prop::collection::vec(("[a-z]{1,10}", "[A-Za-z0-9]{0,12}"), 1..6)
    ) {
        tokio_test::block_on(async move {
            let store = Arc::new(MemoryStore::new());
            let document = store.create_document(invoice()).await.unwrap();

            let mut data = IndexMap::new();
            let mut scores = IndexMap::new();
            for (field, value) in &entries {
                data.insert(field.clone(), value.clone());
                scores.insert(field.clone(), 50u8);
            }
            let expected: Vec<String> = data.keys().cloned().collect();
            store
                .create_extracted_data(&document.id, data, scores)
                .await
                .unwrap();

            let engine = SuggestionEngine::new(
                store.clone(),
                MockEmbedder::new(),
                MockVectorIndex::new(),
                MockGenerator::new(),
            );
            let response = engine.generate_suggestions(&document.id).await.unwrap();

            let produced: Vec<String> =
                response.suggestions.iter().map(|s| s.field.clone()).collect();
            prop_assert_eq!(produced, expected);
            Ok(())
        })?;
    }
}
