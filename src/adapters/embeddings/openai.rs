//! OpenAI-compatible embedding provider adapter.
//!
//! Talks to any `/embeddings` endpoint with the OpenAI request shape.
//! OpenRouter keys (`sk-or-v1-`) are routed to OpenRouter automatically.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{api_key_or_env, build_client, read_json};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::embedding::EmbeddingProvider;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_KEY_PREFIX: &str = "sk-or-v1-";
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Whether a key belongs to OpenRouter rather than OpenAI.
pub fn is_openrouter_key(api_key: &str) -> bool {
    api_key.starts_with(OPENROUTER_KEY_PREFIX)
}

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    /// Overrides the OpenAI/OpenRouter base URL.
    pub base_url: Option<String>,
    /// Overrides the default `text-embedding-3-small`.
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig) -> DomainResult<Self> {
        let api_key = api_key_or_env(config.api_key.as_deref(), "OPENAI_API_KEY");
        let openrouter = api_key.as_deref().is_some_and(is_openrouter_key);

        let base_url = config.base_url.unwrap_or_else(|| {
            if openrouter { OPENROUTER_BASE_URL } else { OPENAI_BASE_URL }.to_string()
        });
        let model = config.model.unwrap_or_else(|| {
            if openrouter {
                format!("openai/{DEFAULT_MODEL}")
            } else {
                DEFAULT_MODEL.to_string()
            }
        });

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: build_client(config.timeout_secs)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainError::ProviderUnavailable(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure api_key.".to_string(),
            )
        })?;

        let request_body = EmbeddingsRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let result: EmbeddingsResponse = read_json(response, "Embedding API").await?;
        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::ProviderFailed("Empty embedding response".to_string()))
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>) -> OpenAiEmbeddingProvider {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
                api_key: api_key.map(str::to_string),
                ..Default::default()
            })
            .unwrap()
        })
    }

    #[test]
    fn test_defaults() {
        let provider = provider(Some("sk-test"));
        assert_eq!(provider.base_url(), OPENAI_BASE_URL);
        assert_eq!(provider.model(), "text-embedding-3-small");
    }

    #[test]
    fn test_openrouter_key_switches_endpoint() {
        let provider = provider(Some("sk-or-v1-abc"));
        assert_eq!(provider.base_url(), OPENROUTER_BASE_URL);
        assert_eq!(provider.model(), "openai/text-embedding-3-small");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let err = provider(None).embed("hello").await.unwrap_err();
        assert!(matches!(err, DomainError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_embed_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "text-embedding-3-small",
                "input": "refund policy"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3],"index":0}]}"#)
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
            api_key: Some("sk-test".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(provider.embed("refund policy").await.unwrap(), vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
            api_key: Some("sk-test".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap();

        let err = provider.embed("hello").await.unwrap_err();
        assert!(err.is_provider_error());
        assert!(err.to_string().contains("403"));
    }
}
