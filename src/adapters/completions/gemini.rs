//! Gemini text generation adapter (`models/{model}:generateContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::embeddings::gemini::GEMINI_BASE_URL;
use crate::adapters::http::{api_key_or_env, build_client, read_json};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::completion::{ChatMessage, ChatRole, CompletionOptions, CompletionProvider};

const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

#[derive(Debug, Clone)]
pub struct GeminiCompletionConfig {
    /// API key. Falls back to `GOOGLE_API_KEY` env var.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiCompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

pub struct GeminiCompletionProvider {
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    client: reqwest::Client,
}

impl GeminiCompletionProvider {
    pub fn new(config: GeminiCompletionConfig) -> DomainResult<Self> {
        Ok(Self {
            api_key: api_key_or_env(config.api_key.as_deref(), "GOOGLE_API_KEY"),
            base_url: config
                .base_url
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            default_model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiCompletionProvider {
    fn name(&self) -> &'static str {
        "gemini"
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
            .ok_or_else(|| DomainError::ProviderUnavailable("Google API Key missing".to_string()))?;

        let request_body = GenerateContentRequest::from_messages(messages, options);
        let model = model.unwrap_or(&self.default_model);

        let response = self
            .client
            .post(format!("{}/models/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let result: GenerateContentResponse = read_json(response, "Gemini generateContent").await?;
        Ok(result.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    /// System messages become the system instruction; the rest map to
    /// `user`/`model` turns.
    fn from_messages(messages: &'a [ChatMessage], options: CompletionOptions) -> Self {
        let system_parts: Vec<Part<'a>> = messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| Part { text: &m.content })
            .collect();

        let contents = messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| Content {
                role: Some(if m.role == ChatRole::Assistant { "model" } else { "user" }),
                parts: vec![Part { text: &m.content }],
            })
            .collect();

        Self {
            system_instruction: (!system_parts.is_empty()).then_some(Content {
                role: None,
                parts: system_parts,
            }),
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = [ChatMessage::system("Be brief."), ChatMessage::user("Context:\nx\n\nQuestion: y")];
        let request = GenerateContentRequest::from_messages(&messages, CompletionOptions::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"].as_array().unwrap().len(), 1);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 250);
    }

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash-latest:generateContent")
            .match_header("x-goog-api-key", "g-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Refunds "},{"text":"are final."}]}}]}"#)
            .create_async()
            .await;

        let provider = GeminiCompletionProvider::new(GeminiCompletionConfig {
            api_key: Some("g-key".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap();

        let answer = provider
            .complete(&[ChatMessage::user("refunds?")], None, CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(answer, "Refunds are final.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forbidden_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash-latest:generateContent")
            .with_status(403)
            .create_async()
            .await;

        let provider = GeminiCompletionProvider::new(GeminiCompletionConfig {
            api_key: Some("g-key".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap();

        let err = provider
            .complete(&[ChatMessage::user("x")], None, CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_provider_error());
    }
}
