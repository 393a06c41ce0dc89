//! OpenAI-compatible embedding and generation clients.
//!
//! Any service exposing the same REST surface (Azure OpenAI, local
//! gateways) works via `with_base_url`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::traits::providers::{EmbeddingProvider, TextGenerator};

const EMBEDDINGS_PROVIDER: &str = "openai embeddings";
const CHAT_PROVIDER: &str = "openai chat";

const SYSTEM_PROMPT: &str = "You are a document processing assistant. Propose corrected values \
                             for extracted fields using the provided context. Answer with the \
                             corrected value only.";

/// Embedding client for an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    /// Create a new embedder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, UpstreamError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| UpstreamError::provider(EMBEDDINGS_PROVIDER, "OPENAI_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    /// Set the embedding model (default: text-embedding-3-small).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::provider(EMBEDDINGS_PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::provider(
                EMBEDDINGS_PROVIDER,
                format!("embedding request failed: {error_text}"),
            ));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::provider(EMBEDDINGS_PROVIDER, e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| UpstreamError::provider(EMBEDDINGS_PROVIDER, "no embedding returned"))
    }
}

/// Text generation client for an OpenAI-compatible `/chat/completions`
/// endpoint.
pub struct OpenAiGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a new generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, UpstreamError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| UpstreamError::provider(CHAT_PROVIDER, "OPENAI_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        if prompt.trim().is_empty() {
            return Err(UpstreamError::EmptyPrompt);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: 256,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::provider(CHAT_PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::provider(
                CHAT_PROVIDER,
                format!("chat request failed: {error_text}"),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::provider(CHAT_PROVIDER, e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| UpstreamError::provider(CHAT_PROVIDER, "no completion returned"))
    }
}
