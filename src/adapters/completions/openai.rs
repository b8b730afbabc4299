//! OpenAI-compatible chat completion adapter (`/chat/completions`).
//!
//! Shares key resolution with the embedding adapter, so an OpenRouter key
//! reaches OpenRouter and per-attempt model overrides can name its free
//! models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::embeddings::openai::{is_openrouter_key, OPENAI_BASE_URL, OPENROUTER_BASE_URL};
use crate::adapters::http::{api_key_or_env, build_client, read_json};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::completion::{ChatMessage, CompletionOptions, CompletionProvider};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct OpenAiCompletionConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OpenAiCompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

pub struct OpenAiCompletionProvider {
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    client: reqwest::Client,
}

impl OpenAiCompletionProvider {
    pub fn new(config: OpenAiCompletionConfig) -> DomainResult<Self> {
        let api_key = api_key_or_env(config.api_key.as_deref(), "OPENAI_API_KEY");
        let openrouter = api_key.as_deref().is_some_and(is_openrouter_key);

        let base_url = config.base_url.unwrap_or_else(|| {
            if openrouter { OPENROUTER_BASE_URL } else { OPENAI_BASE_URL }.to_string()
        });
        let default_model = config.model.unwrap_or_else(|| {
            if openrouter {
                format!("openai/{DEFAULT_MODEL}")
            } else {
                DEFAULT_MODEL.to_string()
            }
        });

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        options: CompletionOptions,
    ) -> DomainResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::ProviderUnavailable("OPENAI_API_KEY is not set".to_string()))?;

        let request_body = ChatCompletionRequest {
            model: model.unwrap_or(&self.default_model),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let result: ChatCompletionResponse = read_json(response, "Chat completion API").await?;
        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(server: &mockito::Server) -> OpenAiCompletionProvider {
        OpenAiCompletionProvider::new(OpenAiCompletionConfig {
            api_key: Some("sk-or-v1-test".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_model_override_and_options_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-or-v1-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "meta-llama/llama-3.1-70b-instruct:free",
                "max_tokens": 250,
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello there"}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        assert_eq!(provider.default_model(), "openai/gpt-4o-mini");

        let answer = provider
            .complete(
                &[ChatMessage::system("sys"), ChatMessage::user("hi")],
                Some("meta-llama/llama-3.1-70b-instruct:free"),
                CompletionOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(answer, "Hello there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_null_content_is_empty_answer() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let answer = provider_for(&server)
            .complete(&[ChatMessage::user("hi")], None, CompletionOptions::default())
            .await
            .unwrap();
        assert!(answer.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let err = provider_for(&server)
            .complete(&[ChatMessage::user("hi")], None, CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_provider_error());
    }
}
