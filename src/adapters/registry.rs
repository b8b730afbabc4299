//! Provider registry and factory.
//!
//! Builds the embedding provider and the completion chain from the
//! `providers` config section. Providers that cannot be constructed are
//! logged and left out, so a broken provider config degrades the semantic
//! path instead of preventing startup.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::{CompletionAttemptConfig, ProviderKind, ProvidersConfig};
use crate::domain::ports::{CompletionOptions, CompletionProvider, EmbeddingProvider, NullEmbeddingProvider};
use crate::services::completion_chain::{CompletionAttempt, CompletionChain};
use crate::services::embedding_service::EmbeddingService;

use super::completions::{
    GeminiCompletionConfig, GeminiCompletionProvider, OpenAiCompletionConfig, OpenAiCompletionProvider,
};
use super::embeddings::{
    GeminiEmbeddingConfig, GeminiEmbeddingProvider, OpenAiEmbeddingConfig, OpenAiEmbeddingProvider,
};

/// Registry of configured providers.
pub struct ProviderRegistry {
    config: ProvidersConfig,
}

impl ProviderRegistry {
    pub const fn new(config: ProvidersConfig) -> Self {
        Self { config }
    }

    /// Create the configured embedding provider, or the null provider.
    pub fn embedding_provider(&self) -> Arc<dyn EmbeddingProvider> {
        let embedding = &self.config.embedding;

        let created: Result<Arc<dyn EmbeddingProvider>, _> = match embedding.kind {
            ProviderKind::Gemini => GeminiEmbeddingProvider::new(GeminiEmbeddingConfig {
                api_key: embedding.api_key.clone(),
                base_url: embedding.base_url.clone(),
                model: embedding.model.clone(),
                timeout_secs: embedding.timeout_secs,
            })
            .map(|p| Arc::new(p) as Arc<dyn EmbeddingProvider>),
            ProviderKind::OpenAi => OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
                api_key: embedding.api_key.clone(),
                base_url: embedding.base_url.clone(),
                model: embedding.model.clone(),
                timeout_secs: embedding.timeout_secs,
            })
            .map(|p| Arc::new(p) as Arc<dyn EmbeddingProvider>),
            ProviderKind::None => Ok(Arc::new(NullEmbeddingProvider::new()) as Arc<dyn EmbeddingProvider>),
        };

        created.unwrap_or_else(|err| {
            tracing::warn!(
                kind = embedding.kind.as_str(),
                error = %err,
                "embedding provider unavailable, semantic path disabled"
            );
            Arc::new(NullEmbeddingProvider::new())
        })
    }

    /// Embedding service over [`Self::embedding_provider`].
    pub fn embedding_service(&self) -> EmbeddingService {
        EmbeddingService::from_config(self.embedding_provider(), &self.config.embedding)
    }

    /// Ordered completion attempts from `providers.generation.attempts`.
    pub fn completion_chain(&self) -> CompletionChain {
        let generation = &self.config.generation;
        let mut chain = CompletionChain::new(CompletionOptions {
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        });

        for attempt in &generation.attempts {
            if let Some(provider) = Self::completion_provider(attempt) {
                chain.push(CompletionAttempt::new(
                    provider,
                    attempt.model.clone(),
                    Duration::from_secs(attempt.timeout_secs),
                ));
            }
        }

        tracing::debug!(attempts = chain.len(), "completion chain built");
        chain
    }

    fn completion_provider(attempt: &CompletionAttemptConfig) -> Option<Arc<dyn CompletionProvider>> {
        let created = match attempt.kind {
            ProviderKind::Gemini => GeminiCompletionProvider::new(GeminiCompletionConfig {
                api_key: attempt.api_key.clone(),
                base_url: attempt.base_url.clone(),
                model: None,
                timeout_secs: attempt.timeout_secs,
            })
            .map(|p| Arc::new(p) as Arc<dyn CompletionProvider>),
            ProviderKind::OpenAi => OpenAiCompletionProvider::new(OpenAiCompletionConfig {
                api_key: attempt.api_key.clone(),
                base_url: attempt.base_url.clone(),
                model: None,
                timeout_secs: attempt.timeout_secs,
            })
            .map(|p| Arc::new(p) as Arc<dyn CompletionProvider>),
            ProviderKind::None => return None,
        };

        match created {
            Ok(provider) => Some(provider),
            Err(err) => {
                tracing::warn!(kind = attempt.kind.as_str(), error = %err, "skipping completion provider");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EmbeddingConfig, GenerationConfig};

    #[test]
    fn test_default_registry() {
        let registry = ProviderRegistry::new(ProvidersConfig::default());

        assert_eq!(registry.embedding_provider().name(), "gemini");

        let chain = registry.completion_chain();
        let models: Vec<_> = chain.attempts().iter().map(CompletionAttempt::model).collect();
        assert_eq!(
            models[1..],
            [
                "meta-llama/llama-3.1-70b-instruct:free",
                "nousresearch/hermes-3-llama-3.1-405b:free"
            ]
        );
        assert_eq!(chain.attempts()[0].provider_name(), "gemini");
        assert_eq!(chain.attempts()[0].model(), "gemini-1.5-flash-latest");
    }

    #[test]
    fn test_none_kinds() {
        let registry = ProviderRegistry::new(ProvidersConfig {
            embedding: EmbeddingConfig {
                kind: ProviderKind::None,
                ..EmbeddingConfig::default()
            },
            generation: GenerationConfig {
                attempts: vec![CompletionAttemptConfig::new(ProviderKind::None, None)],
                ..GenerationConfig::default()
            },
        });

        assert_eq!(registry.embedding_provider().name(), "null");
        assert!(registry.completion_chain().is_empty());
    }

    #[test]
    fn test_openai_embedding_kind() {
        let registry = ProviderRegistry::new(ProvidersConfig {
            embedding: EmbeddingConfig {
                kind: ProviderKind::OpenAi,
                api_key: Some("sk-test".to_string()),
                ..EmbeddingConfig::default()
            },
            ..ProvidersConfig::default()
        });

        let provider = registry.embedding_provider();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "text-embedding-3-small");
    }
}
