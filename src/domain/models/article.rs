//! Knowledge-base article domain model.
//!
//! Articles are owned by the content-management side; the resolution core
//! only reads them (title, tags, slug and `updated_at` feed into scoring and
//! into the answer payload).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Publication status shared by articles and their passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Visible to end users and eligible for matching
    Published,
    /// Work in progress, never matched
    Draft,
}

impl Default for ArticleStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl ArticleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "published" => Some(Self::Published),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }

    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A knowledge-base article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub tags: Vec<String>,
    /// Full body text; the chunker's input
    pub content: String,
    pub status: ArticleStatus,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a draft article with a fresh id and a slug derived from the title.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: slugify(&title),
            title,
            tags: Vec::new(),
            content: content.into(),
            status: ArticleStatus::Draft,
            updated_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub const fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn published(self) -> Self {
        self.with_status(ArticleStatus::Published)
    }

    /// Lightweight view carried alongside each passage.
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            tags: self.tags.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Parent-article fields joined onto a passage at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// URL slug for a title: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Refund Policy"), "refund-policy");
        assert_eq!(slugify("  How to: create a ticket?! "), "how-to-create-a-ticket");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(ArticleStatus::from_str("Published"), Some(ArticleStatus::Published));
        assert_eq!(ArticleStatus::from_str("draft"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::from_str("archived"), None);
        assert_eq!(ArticleStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_new_article_defaults() {
        let article = Article::new("Refund Policy", "All sales are final.");
        assert_eq!(article.slug, "refund-policy");
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.tags.is_empty());

        let published = article.with_tags(["billing"]).published();
        assert!(published.status.is_published());
        assert_eq!(published.summary().tags, vec!["billing".to_string()]);
    }
}
