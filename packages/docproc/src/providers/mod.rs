//! Reference provider clients.
//!
//! Thin `reqwest` clients implementing the provider traits against
//! OpenAI-compatible and Pinecone-compatible REST APIs. Applications with
//! other providers implement the traits directly.

pub mod openai;
pub mod pinecone;

pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use pinecone::PineconeIndex;
