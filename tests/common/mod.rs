//! Common test utilities for integration tests
//!
//! Fake providers plus an in-memory knowledge base wired the same way the
//! CLI wires the real one.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use deflector::adapters::sqlite::{create_migrated_test_pool, SqliteArticleRepository, SqlitePassageStore};
use deflector::domain::errors::{DomainError, DomainResult};
use deflector::domain::models::{Article, ResolutionConfig};
use deflector::domain::ports::{ChatMessage, CompletionOptions, CompletionProvider, EmbeddingProvider};
use deflector::services::{
    ArticleSyncService, Chunker, CompletionAttempt, CompletionChain, EmbeddingService,
    ResolutionOrchestrator,
};

/// Words the keyword embedder projects onto, one dimension each.
const VOCABULARY: &[&str] = &["refund", "sales", "password", "reset", "shipping", "delivery"];

/// Embedding provider that fails every call.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }

    async fn embed(&self, _text: &str) -> DomainResult<Vec<f32>> {
        Err(DomainError::ProviderFailed("embedding backend down".to_string()))
    }
}

/// The vector [`KeywordEmbedder`] produces for `text`.
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    VOCABULARY
        .iter()
        .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
        .collect()
}

/// Deterministic embedder: one dimension per vocabulary word, 1.0 when the
/// lowercased text contains it.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn model(&self) -> &str {
        "keyword-v1"
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(keyword_vector(text))
    }
}

/// Embedder whose every vector carries a NaN component.
pub struct NanEmbedder;

#[async_trait]
impl EmbeddingProvider for NanEmbedder {
    fn name(&self) -> &'static str {
        "nan"
    }

    fn model(&self) -> &str {
        "nan-model"
    }

    async fn embed(&self, _text: &str) -> DomainResult<Vec<f32>> {
        Ok(vec![f32::NAN, 1.0])
    }
}

/// Completion provider returning a fixed answer and recording what it saw.
pub struct FixedCompletion {
    pub answer: String,
    pub last_messages: std::sync::Mutex<Vec<ChatMessage>>,
}

impl FixedCompletion {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            last_messages: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for FixedCompletion {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn default_model(&self) -> &str {
        "fixed-model"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _model: Option<&str>,
        _options: CompletionOptions,
    ) -> DomainResult<String> {
        *self.last_messages.lock().unwrap() = messages.to_vec();
        Ok(self.answer.clone())
    }
}

/// Completion provider that always errors.
pub struct FailingCompletion;

#[async_trait]
impl CompletionProvider for FailingCompletion {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "failing-model"
    }

    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _model: Option<&str>,
        _options: CompletionOptions,
    ) -> DomainResult<String> {
        Err(DomainError::ProviderFailed("generation backend down".to_string()))
    }
}

pub fn chain_of(providers: Vec<Arc<dyn CompletionProvider>>) -> CompletionChain {
    providers.into_iter().fold(CompletionChain::default(), |chain, provider| {
        chain.with_attempt(CompletionAttempt::new(provider, None, Duration::from_secs(5)))
    })
}

/// In-memory knowledge base plus the services built over it.
pub struct TestKb {
    pub pool: sqlx::SqlitePool,
    pub passages: Arc<SqlitePassageStore>,
    pub articles: Arc<SqliteArticleRepository>,
    pub embeddings: Arc<EmbeddingService>,
    pub sync: ArticleSyncService,
}

impl TestKb {
    pub async fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let pool = create_migrated_test_pool().await.expect("test pool");
        let passages = Arc::new(SqlitePassageStore::new(pool.clone()));
        let articles = Arc::new(SqliteArticleRepository::new(pool.clone()));
        let embeddings = Arc::new(EmbeddingService::new(embedder, Duration::from_secs(5)));
        let sync = ArticleSyncService::new(
            articles.clone(),
            passages.clone(),
            embeddings.clone(),
            Chunker::new(),
        );

        Self {
            pool,
            passages,
            articles,
            embeddings,
            sync,
        }
    }

    pub async fn add(&self, article: Article) -> Article {
        self.sync.save(&article).await.expect("save article");
        article
    }

    pub fn orchestrator(&self, completions: CompletionChain) -> ResolutionOrchestrator {
        ResolutionOrchestrator::new(
            self.passages.clone(),
            self.embeddings.clone(),
            completions,
            ResolutionConfig::default(),
        )
    }
}

pub fn refund_article() -> Article {
    Article::new("Refund Policy", "All sales are final. We do not offer refunds.")
        .with_id("refund")
        .published()
}

pub fn password_article() -> Article {
    Article::new(
        "Password Reset",
        "Open the login page and choose Forgot password. We email you a reset link within minutes.",
    )
    .with_id("password")
    .with_tags(["account", "login"])
    .published()
}

/// Midnight UTC on the given January 2026 day.
pub fn january(day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()
}
