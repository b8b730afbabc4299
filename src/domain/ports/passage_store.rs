use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Article, ArticleStatus, Passage, PassageDraft, PassageWithArticle};

/// Storage interface for article passages
///
/// The resolution path only reads through [`PassageStore::get_published`];
/// the remaining operations keep the passage set in step with its article.
#[async_trait]
pub trait PassageStore: Send + Sync {
    /// All published passages joined with their parent article's title,
    /// slug, tags and `updated_at`.
    ///
    /// Ordering is deterministic (article id, then chunk index).
    async fn get_published(&self) -> DomainResult<Vec<PassageWithArticle>>;

    /// Atomically replace every passage of an article.
    ///
    /// Existing passages are deleted and `drafts` inserted with contiguous
    /// zero-based indices and the given status. Concurrent readers observe
    /// either the old set or the new one, never a mix.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of passages written
    async fn sync_for_article(
        &self,
        article_id: &str,
        drafts: Vec<PassageDraft>,
        status: ArticleStatus,
    ) -> DomainResult<usize>;

    /// Store `article` and replace its passages in one atomic write.
    ///
    /// Readers never see the new title or tags joined to the old passage
    /// set. Passages take the article's status.
    async fn save_with_article(&self, article: &Article, drafts: Vec<PassageDraft>) -> DomainResult<usize>;

    /// Set the status of every passage of an article.
    async fn update_status(&self, article_id: &str, status: ArticleStatus) -> DomainResult<u64>;

    /// Delete every passage of an article.
    async fn delete_for_article(&self, article_id: &str) -> DomainResult<u64>;

    /// Every stored passage regardless of status, for maintenance runs.
    async fn list_all(&self) -> DomainResult<Vec<Passage>>;

    /// Replace one passage's embedding.
    async fn set_embedding(&self, passage_id: &str, embedding: &[f32]) -> DomainResult<()>;
}
