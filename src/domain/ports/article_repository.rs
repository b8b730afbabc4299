use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Article, ArticleStatus};

/// Repository interface for the article records passages are joined against
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert or replace an article by id.
    async fn upsert(&self, article: &Article) -> DomainResult<()>;

    /// Get an article by id.
    async fn get(&self, id: &str) -> DomainResult<Option<Article>>;

    /// List articles, most recently updated first, optionally filtered by status.
    async fn list(&self, status: Option<ArticleStatus>) -> DomainResult<Vec<Article>>;

    /// Delete an article. Its passages go with it.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
