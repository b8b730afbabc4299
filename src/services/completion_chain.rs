//! Ordered generation fallback.
//!
//! Attempts run one after another; the first non-empty answer wins and the
//! rest are never called.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::ports::completion::{ChatMessage, CompletionOptions, CompletionProvider};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{provider} ({model}) failed: {source}")]
    Failed {
        provider: &'static str,
        model: String,
        #[source]
        source: DomainError,
    },

    #[error("{provider} ({model}) timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        model: String,
        timeout_ms: u128,
    },

    #[error("{provider} ({model}) returned an empty answer")]
    Empty {
        provider: &'static str,
        model: String,
    },

    #[error("No completion providers configured")]
    NoAttempts,

    #[error("All {0} completion attempts failed")]
    Exhausted(usize),
}

/// One provider/model pair in the chain.
#[derive(Clone)]
pub struct CompletionAttempt {
    provider: Arc<dyn CompletionProvider>,
    model: Option<String>,
    timeout: Duration,
}

impl CompletionAttempt {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: Option<String>, timeout: Duration) -> Self {
        Self {
            provider,
            model,
            timeout,
        }
    }

    /// Model this attempt sends, falling back to the provider default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    async fn run(&self, messages: &[ChatMessage], options: CompletionOptions) -> Result<String, CompletionError> {
        let provider = self.provider.name();
        let model = self.model().to_string();

        let call = self.provider.complete(messages, self.model.as_deref(), options);
        let answer = match tokio::time::timeout(self.timeout, call).await {
            Err(_) => {
                return Err(CompletionError::Timeout {
                    provider,
                    model,
                    timeout_ms: self.timeout.as_millis(),
                })
            }
            Ok(Err(source)) => {
                return Err(CompletionError::Failed {
                    provider,
                    model,
                    source,
                })
            }
            Ok(Ok(answer)) => answer,
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(CompletionError::Empty { provider, model });
        }
        Ok(answer.to_string())
    }
}

/// Sequential attempt list with early exit.
#[derive(Clone, Default)]
pub struct CompletionChain {
    attempts: Vec<CompletionAttempt>,
    options: CompletionOptions,
}

impl CompletionChain {
    pub fn new(options: CompletionOptions) -> Self {
        Self {
            attempts: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub fn with_attempt(mut self, attempt: CompletionAttempt) -> Self {
        self.attempts.push(attempt);
        self
    }

    pub fn push(&mut self, attempt: CompletionAttempt) {
        self.attempts.push(attempt);
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn attempts(&self) -> &[CompletionAttempt] {
        &self.attempts
    }

    /// Run attempts in order and return the first non-empty answer.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        if self.attempts.is_empty() {
            return Err(CompletionError::NoAttempts);
        }

        for (position, attempt) in self.attempts.iter().enumerate() {
            match attempt.run(messages, self.options).await {
                Ok(answer) => {
                    tracing::info!(
                        provider = attempt.provider_name(),
                        model = attempt.model(),
                        position,
                        "completion succeeded"
                    );
                    return Ok(answer);
                }
                Err(err) => {
                    tracing::warn!(error = %err, position, "completion attempt failed");
                }
            }
        }

        Err(CompletionError::Exhausted(self.attempts.len()))
    }
}
