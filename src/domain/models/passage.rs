//! Passage (article chunk) domain models.

use serde::{Deserialize, Serialize};

use super::article::{ArticleStatus, ArticleSummary};

/// A bounded-size slice of one article's content.
///
/// Passages are derived from the article body by the chunker and are always
/// regenerated as a complete set when the article changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// `"{article_id}:chunk:{index}"`
    pub id: String,
    pub article_id: String,
    /// Zero-based, contiguous within one article
    pub index: usize,
    pub text: String,
    /// Absent when the embedding provider was unavailable at sync time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Mirrors the parent article's status at sync time
    pub status: ArticleStatus,
}

impl Passage {
    pub fn new(article_id: impl Into<String>, index: usize, text: impl Into<String>) -> Self {
        let article_id = article_id.into();
        Self {
            id: passage_id(&article_id, index),
            article_id,
            index,
            text: text.into(),
            embedding: None,
            status: ArticleStatus::Draft,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub const fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this passage can take part in vector ranking.
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Stable passage id for a chunk position.
pub fn passage_id(article_id: &str, index: usize) -> String {
    format!("{article_id}:chunk:{index}")
}

/// Input to an atomic passage replacement: one chunk and its optional embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct PassageDraft {
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

impl PassageDraft {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embedding: None,
        }
    }
}

/// A passage joined with the parent-article fields used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageWithArticle {
    pub passage: Passage,
    pub article: ArticleSummary,
}

impl PassageWithArticle {
    pub fn is_published(&self) -> bool {
        self.passage.status.is_published()
    }
}

/// A passage with its per-query relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPassage {
    pub passage: PassageWithArticle,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passage_id_format() {
        let passage = Passage::new("article-1", 3, "text");
        assert_eq!(passage.id, "article-1:chunk:3");
        assert_eq!(passage.index, 3);
    }

    #[test]
    fn test_has_embedding() {
        let passage = Passage::new("a", 0, "text");
        assert!(!passage.has_embedding());
        assert!(!passage.clone().with_embedding(Vec::new()).has_embedding());
        assert!(passage.with_embedding(vec![0.1, 0.2]).has_embedding());
    }
}
