//! Keeps stored passages in step with their articles.
//!
//! Saving an article re-chunks and re-embeds it and swaps its whole passage
//! set in one transaction. Status changes and deletions are mirrored onto
//! the passages, and a bulk re-embed refreshes every stored vector.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Article, ArticleStatus, PassageDraft};
use crate::domain::ports::{ArticleRepository, PassageStore};
use crate::services::chunker::Chunker;
use crate::services::embedding_service::EmbeddingService;

/// Outcome of saving one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub article_id: String,
    pub passages: usize,
    pub embedded: usize,
}

/// Outcome of a bulk re-embed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReembedReport {
    pub total: usize,
    pub updated: usize,
    pub errors: usize,
}

pub struct ArticleSyncService {
    articles: Arc<dyn ArticleRepository>,
    passages: Arc<dyn PassageStore>,
    embeddings: Arc<EmbeddingService>,
    chunker: Chunker,
}

impl ArticleSyncService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        passages: Arc<dyn PassageStore>,
        embeddings: Arc<EmbeddingService>,
        chunker: Chunker,
    ) -> Self {
        Self {
            articles,
            passages,
            embeddings,
            chunker,
        }
    }

    /// Store `article` and regenerate its passages.
    ///
    /// Chunking and embedding happen first; the article row and its passage
    /// set are then written in a single transaction. Chunks whose embedding
    /// fails are still stored, without a vector.
    pub async fn save(&self, article: &Article) -> DomainResult<SyncReport> {
        if article.title.trim().is_empty() {
            return Err(DomainError::ValidationFailed("Article title cannot be empty".to_string()));
        }

        let chunks = self.chunker.chunk(&article.content);
        let mut drafts = Vec::with_capacity(chunks.len());
        let mut embedded = 0;

        for (index, text) in chunks.into_iter().enumerate() {
            let embedding = match self.embeddings.embed_throttled(&text).await {
                Ok(vector) if !vector.is_empty() => {
                    embedded += 1;
                    Some(vector)
                }
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!(
                        article_id = %article.id,
                        index,
                        error = %err,
                        "embedding failed, storing passage without vector"
                    );
                    None
                }
            };
            drafts.push(PassageDraft { text, embedding });
        }

        let passages = self.passages.save_with_article(article, drafts).await?;

        tracing::info!(
            article_id = %article.id,
            passages,
            embedded,
            status = %article.status,
            "article synced"
        );

        Ok(SyncReport {
            article_id: article.id.clone(),
            passages,
            embedded,
        })
    }

    /// Flip an article's status and mirror it onto its passages.
    pub async fn set_status(&self, article_id: &str, status: ArticleStatus) -> DomainResult<Article> {
        let mut article = self
            .articles
            .get(article_id)
            .await?
            .ok_or_else(|| DomainError::ArticleNotFound(article_id.to_string()))?;

        article.status = status;
        article.updated_at = Utc::now();
        self.articles.upsert(&article).await?;

        let updated = self.passages.update_status(article_id, status).await?;
        tracing::info!(article_id, status = %status, passages = updated, "article status changed");

        Ok(article)
    }

    /// Delete an article together with its passages.
    pub async fn remove(&self, article_id: &str) -> DomainResult<u64> {
        let removed = self.passages.delete_for_article(article_id).await?;
        self.articles.delete(article_id).await?;

        tracing::info!(article_id, passages = removed, "article removed");
        Ok(removed)
    }

    /// Re-embed every stored passage, reporting progress after each one.
    ///
    /// Individual failures are counted, never fatal.
    pub async fn reembed_all<F>(&self, mut on_progress: F) -> DomainResult<ReembedReport>
    where
        F: FnMut(usize, usize) + Send,
    {
        let passages = self.passages.list_all().await?;
        let mut report = ReembedReport {
            total: passages.len(),
            ..ReembedReport::default()
        };

        for (done, passage) in passages.iter().enumerate() {
            let result = match self.embeddings.embed_throttled(&passage.text).await {
                Ok(vector) if vector.is_empty() => Err(DomainError::ProviderUnavailable(
                    self.embeddings.provider_name().to_string(),
                )),
                Ok(vector) => self.passages.set_embedding(&passage.id, &vector).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => report.updated += 1,
                Err(err) => {
                    report.errors += 1;
                    tracing::warn!(passage_id = %passage.id, error = %err, "re-embed failed");
                }
            }

            on_progress(done + 1, report.total);
        }

        tracing::info!(
            total = report.total,
            updated = report.updated,
            errors = report.errors,
            "re-embed finished"
        );
        Ok(report)
    }
}
