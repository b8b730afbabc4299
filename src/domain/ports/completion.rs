//! Text-generation provider port.
//!
//! A completion provider turns a short chat transcript (system prompt plus
//! the user's question with retrieved context) into answer text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling settings shared by every attempt in a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 250,
            temperature: 0.7,
        }
    }
}

/// Trait for text-generation backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &'static str;

    /// Model used when the caller does not override it.
    fn default_model(&self) -> &str;

    /// Generate a reply. `model` overrides the provider default for this call.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        options: CompletionOptions,
    ) -> DomainResult<String>;
}
