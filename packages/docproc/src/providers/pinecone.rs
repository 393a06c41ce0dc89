//! Pinecone-compatible vector index client.
//!
//! Every query carries a `documentId` equality filter so chunks from other
//! documents never reach the engine.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::traits::providers::{ContextMatch, VectorIndex};

const PROVIDER: &str = "pinecone";

/// Client for one Pinecone index host.
pub struct PineconeIndex {
    client: Client,
    api_key: SecretString,
    host: String,
}

impl PineconeIndex {
    /// Create a client for an index host
    /// (e.g. `https://document-index-xxxxxxx.svc.us-east-1.pinecone.io`).
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            host: host.into(),
        }
    }

    /// Create from the `PINECONE_HOST` and `PINECONE_API_KEY` environment
    /// variables.
    pub fn from_env() -> Result<Self, UpstreamError> {
        let host = std::env::var("PINECONE_HOST")
            .map_err(|_| UpstreamError::provider(PROVIDER, "PINECONE_HOST not set"))?;
        let api_key = std::env::var("PINECONE_API_KEY")
            .map_err(|_| UpstreamError::provider(PROVIDER, "PINECONE_API_KEY not set"))?;
        Ok(Self::new(host, api_key))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    filter: serde_json::Value,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    text: Option<String>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<ContextMatch>, UpstreamError> {
        let request = QueryRequest {
            vector,
            top_k,
            filter: serde_json::json!({ "documentId": { "$eq": document_id } }),
            include_metadata: true,
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::provider(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::provider(
                PROVIDER,
                format!("query failed: {error_text}"),
            ));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::provider(PROVIDER, e.to_string()))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| ContextMatch {
                score: m.score,
                text: m.metadata.and_then(|md| md.text),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_shape() {
        let vector = [0.1_f32, 0.2];
        let request = QueryRequest {
            vector: &vector,
            top_k: 3,
            filter: serde_json::json!({ "documentId": { "$eq": "d1" } }),
            include_metadata: true,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["topK"], 3);
        assert_eq!(value["includeMetadata"], true);
        assert_eq!(value["filter"]["documentId"]["$eq"], "d1");
    }

    #[test]
    fn test_matches_without_metadata_parse_to_empty_payload() {
        let json = r#"{
            "matches": [
                { "score": 0.91, "metadata": { "text": "Acme Corp Inc." } },
                { "score": 0.42 },
                { "score": 0.40, "metadata": {} }
            ]
        }"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        let matches: Vec<ContextMatch> = parsed
            .matches
            .into_iter()
            .map(|m| ContextMatch {
                score: m.score,
                text: m.metadata.and_then(|md| md.text),
            })
            .collect();

        assert_eq!(matches[0].text.as_deref(), Some("Acme Corp Inc."));
        assert!(matches[1].text.is_none());
        assert!(matches[2].text.is_none());
    }
}
