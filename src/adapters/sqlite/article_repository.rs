//! SQLite implementation of the ArticleRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Article, ArticleStatus};
use crate::domain::ports::ArticleRepository;

const ARTICLE_COLUMNS: &str = "id, title, slug, tags, content, status, updated_at";

/// Insert or replace one article row on any executor, so callers can share
/// a transaction with other writes.
pub(super) async fn upsert_article<'e, E>(executor: E, article: &Article) -> DomainResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let tags_json = serde_json::to_string(&article.tags)?;

    sqlx::query(
        r#"INSERT INTO articles (id, title, slug, tags, content, status, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)
           ON CONFLICT(id) DO UPDATE SET
               title = excluded.title,
               slug = excluded.slug,
               tags = excluded.tags,
               content = excluded.content,
               status = excluded.status,
               updated_at = excluded.updated_at"#,
    )
    .bind(&article.id)
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&tags_json)
    .bind(&article.content)
    .bind(article.status.as_str())
    .bind(article.updated_at.to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}

#[derive(Clone)]
pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn upsert(&self, article: &Article) -> DomainResult<()> {
        upsert_article(&self.pool, article).await
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Article>> {
        let row: Option<ArticleRow> =
            sqlx::query_as(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, status: Option<ArticleStatus>) -> DomainResult<Vec<Article>> {
        let rows: Vec<ArticleRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status = ? ORDER BY updated_at DESC, id"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY updated_at DESC, id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArticleNotFound(id.to_string()));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: String,
    title: String,
    slug: String,
    tags: Option<String>,
    content: String,
    status: String,
    updated_at: String,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let status = ArticleStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            tags: parse_json_or_default(row.tags)?,
            content: row.content,
            status,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
