//! SQLite implementation of the PassageStore.
//!
//! Embeddings are stored as JSON arrays in a nullable TEXT column. A column
//! that no longer parses reads back as "no embedding" so the passage stays
//! lexically matchable.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

use super::article_repository::upsert_article;
use super::{parse_datetime, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    passage_id, Article, ArticleStatus, ArticleSummary, Passage, PassageDraft, PassageWithArticle,
};
use crate::domain::ports::PassageStore;

#[derive(Clone)]
pub struct SqlitePassageStore {
    pool: SqlitePool,
}

impl SqlitePassageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PassageStore for SqlitePassageStore {
    async fn get_published(&self) -> DomainResult<Vec<PassageWithArticle>> {
        let rows: Vec<PublishedPassageRow> = sqlx::query_as(
            r#"SELECT p.id, p.article_id, p.chunk_index, p.text, p.embedding, p.status,
                      a.title, a.slug, a.tags, a.updated_at
               FROM passages p
               JOIN articles a ON a.id = p.article_id
               WHERE p.status = 'published' AND a.status = 'published'
               ORDER BY p.article_id, p.chunk_index"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn sync_for_article(
        &self,
        article_id: &str,
        drafts: Vec<PassageDraft>,
        status: ArticleStatus,
    ) -> DomainResult<usize> {
        let mut tx = self.pool.begin().await?;
        replace_passages(&mut *tx, article_id, &drafts, status).await?;
        tx.commit().await?;

        tracing::debug!(article_id, passages = drafts.len(), status = %status, "passages replaced");
        Ok(drafts.len())
    }

    async fn save_with_article(&self, article: &Article, drafts: Vec<PassageDraft>) -> DomainResult<usize> {
        let mut tx = self.pool.begin().await?;
        upsert_article(&mut *tx, article).await?;
        replace_passages(&mut *tx, &article.id, &drafts, article.status).await?;
        tx.commit().await?;

        tracing::debug!(
            article_id = %article.id,
            passages = drafts.len(),
            status = %article.status,
            "article and passages replaced"
        );
        Ok(drafts.len())
    }

    async fn update_status(&self, article_id: &str, status: ArticleStatus) -> DomainResult<u64> {
        let result = sqlx::query("UPDATE passages SET status = ? WHERE article_id = ?")
            .bind(status.as_str())
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_for_article(&self, article_id: &str) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM passages WHERE article_id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> DomainResult<Vec<Passage>> {
        let rows: Vec<PassageRow> = sqlx::query_as(
            "SELECT id, article_id, chunk_index, text, embedding, status FROM passages ORDER BY article_id, chunk_index",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_embedding(&self, passage_id: &str, embedding: &[f32]) -> DomainResult<()> {
        if !is_finite(embedding) {
            return Err(DomainError::ValidationFailed(format!(
                "Embedding for {passage_id} holds non-finite values"
            )));
        }
        let embedding_json = serde_json::to_string(embedding)?;

        let result = sqlx::query("UPDATE passages SET embedding = ? WHERE id = ?")
            .bind(&embedding_json)
            .bind(passage_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ValidationFailed(format!("Passage not found: {passage_id}")));
        }

        Ok(())
    }
}

async fn replace_passages(
    conn: &mut SqliteConnection,
    article_id: &str,
    drafts: &[PassageDraft],
    status: ArticleStatus,
) -> DomainResult<()> {
    sqlx::query("DELETE FROM passages WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *conn)
        .await?;

    for (index, draft) in drafts.iter().enumerate() {
        let id = passage_id(article_id, index);
        let embedding_json = match draft.embedding.as_deref() {
            Some(embedding) if !embedding.is_empty() => {
                if is_finite(embedding) {
                    Some(serde_json::to_string(embedding)?)
                } else {
                    tracing::warn!(passage_id = %id, "dropping non-finite embedding");
                    None
                }
            }
            _ => None,
        };

        sqlx::query(
            r#"INSERT INTO passages (id, article_id, chunk_index, text, embedding, status)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(article_id)
        .bind(i64::try_from(index).map_err(|e| DomainError::ValidationFailed(e.to_string()))?)
        .bind(&draft.text)
        .bind(embedding_json)
        .bind(status.as_str())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

fn is_finite(embedding: &[f32]) -> bool {
    embedding.iter().all(|x| x.is_finite())
}

fn parse_embedding(passage_id: &str, column: Option<String>) -> Option<Vec<f32>> {
    let raw = column?;
    match serde_json::from_str::<Vec<f32>>(&raw) {
        Ok(embedding) => Some(embedding),
        Err(err) => {
            tracing::debug!(passage_id, error = %err, "unreadable embedding treated as missing");
            None
        }
    }
}

#[derive(sqlx::FromRow)]
struct PassageRow {
    id: String,
    article_id: String,
    chunk_index: i64,
    text: String,
    embedding: Option<String>,
    status: String,
}

impl TryFrom<PassageRow> for Passage {
    type Error = DomainError;

    fn try_from(row: PassageRow) -> Result<Self, Self::Error> {
        let status = ArticleStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;
        let index = usize::try_from(row.chunk_index)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        let embedding = parse_embedding(&row.id, row.embedding);

        Ok(Self {
            id: row.id,
            article_id: row.article_id,
            index,
            text: row.text,
            embedding,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PublishedPassageRow {
    #[sqlx(flatten)]
    passage: PassageRow,
    title: String,
    slug: String,
    tags: Option<String>,
    updated_at: String,
}

impl TryFrom<PublishedPassageRow> for PassageWithArticle {
    type Error = DomainError;

    fn try_from(row: PublishedPassageRow) -> Result<Self, Self::Error> {
        let passage = Passage::try_from(row.passage)?;
        let article = ArticleSummary {
            id: passage.article_id.clone(),
            title: row.title,
            slug: row.slug,
            tags: parse_json_or_default(row.tags)?,
            updated_at: parse_datetime(&row.updated_at)?,
        };

        Ok(Self { passage, article })
    }
}
