//! Embedding service for query-time and bulk vector generation.
//!
//! Wraps an [`EmbeddingProvider`] with input cleanup and a per-call timeout.
//! Bulk callers go through [`EmbeddingService::embed_throttled`], which waits
//! on a rate limiter first so maintenance runs do not flood the provider.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::embedding::EmbeddingProvider;

/// Embedding service shared by the resolution and sync paths.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            limiter: None,
        }
    }

    /// Build from the `providers.embedding` config section.
    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self::new(provider, Duration::from_secs(config.timeout_secs))
            .with_rate_limit(config.requests_per_second)
    }

    /// Limit [`Self::embed_throttled`] to `requests_per_second`. Zero disables the limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.limiter = NonZeroU32::new(requests_per_second)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));
        self
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Embed one text, bounded by the configured timeout.
    ///
    /// Newlines are flattened and the text trimmed before sending. Empty
    /// input yields an empty vector without calling the provider.
    pub async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }

        match tokio::time::timeout(self.timeout, self.provider.embed(&cleaned)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::ProviderTimeout(self.timeout.as_secs())),
        }
    }

    /// Embed a query, collapsing every failure mode into `None`.
    pub async fn embed_query(&self, question: &str) -> Option<Vec<f32>> {
        match self.embed(question).await {
            Ok(vector) if !vector.is_empty() => Some(vector),
            Ok(_) => {
                tracing::debug!(provider = self.provider_name(), "embedding unavailable");
                None
            }
            Err(err) => {
                tracing::warn!(
                    provider = self.provider_name(),
                    error = %err,
                    "query embedding failed"
                );
                None
            }
        }
    }

    /// Wait for the rate limiter, then embed.
    pub async fn embed_throttled(&self, text: &str) -> DomainResult<Vec<f32>> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        self.embed(text).await
    }
}

fn clean_text(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}
