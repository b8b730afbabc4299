//! Gemini embedding provider adapter (`models/{model}:embedContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{api_key_or_env, build_client, read_json};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::embedding::EmbeddingProvider;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "text-embedding-004";

#[derive(Debug, Clone)]
pub struct GeminiEmbeddingConfig {
    /// API key. Falls back to `GOOGLE_API_KEY` env var.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

pub struct GeminiEmbeddingProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiEmbeddingProvider {
    pub fn new(config: GeminiEmbeddingConfig) -> DomainResult<Self> {
        Ok(Self {
            api_key: api_key_or_env(config.api_key.as_deref(), "GOOGLE_API_KEY"),
            base_url: config
                .base_url
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::ProviderUnavailable("GOOGLE_API_KEY is not set".to_string()))?;

        let model_path = format!("models/{}", self.model);
        let request_body = EmbedContentRequest {
            model: &model_path,
            content: Content {
                parts: vec![Part { text }],
            },
        };

        let response = self
            .client
            .post(format!("{}/{model_path}:embedContent", self.base_url))
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let result: EmbedContentResponse = read_json(response, "Gemini embedContent").await?;
        Ok(result.embedding.values)
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
