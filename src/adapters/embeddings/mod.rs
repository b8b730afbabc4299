//! Embedding provider adapters.

pub mod gemini;
pub mod openai;

pub use gemini::{GeminiEmbeddingConfig, GeminiEmbeddingProvider};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
