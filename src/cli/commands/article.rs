//! Implementation of the `deflector article` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Article, ArticleStatus, Config};
use crate::domain::ports::ArticleRepository;
use crate::services::SyncReport;

#[derive(Args, Debug)]
pub struct ArticleArgs {
    #[command(subcommand)]
    pub command: ArticleCommands,
}

#[derive(Subcommand, Debug)]
pub enum ArticleCommands {
    /// Store an article from a text file, then chunk and embed it
    Add {
        /// Article title
        #[arg(long)]
        title: String,

        /// File holding the article body
        #[arg(long)]
        file: PathBuf,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Publication status
        #[arg(long, value_enum, default_value_t = StatusArg::Draft)]
        status: StatusArg,

        /// Existing article id to replace (a new id is generated otherwise)
        #[arg(long)]
        id: Option<String>,
    },

    /// Make an article and its passages answerable
    Publish {
        /// Article ID
        id: String,
    },

    /// Return an article and its passages to draft
    Unpublish {
        /// Article ID
        id: String,
    },

    /// Delete an article and its passages
    Remove {
        /// Article ID
        id: String,
    },

    /// List stored articles
    List {
        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Published,
    Draft,
}

impl From<StatusArg> for ArticleStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Published => Self::Published,
            StatusArg::Draft => Self::Draft,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleSavedOutput {
    pub article_id: String,
    pub slug: String,
    pub status: ArticleStatus,
    pub passages: usize,
    pub embedded: usize,
}

impl CommandOutput for ArticleSavedOutput {
    fn to_human(&self) -> String {
        format!(
            "Article saved: {} ({})\n  Slug: {}\n  Passages: {} ({} embedded)",
            self.article_id, self.status, self.slug, self.passages, self.embedded
        )
    }
}

#[derive(Debug, Serialize)]
pub struct StatusChangedOutput {
    pub article_id: String,
    pub status: ArticleStatus,
}

impl CommandOutput for StatusChangedOutput {
    fn to_human(&self) -> String {
        format!("Article {} is now {}", self.article_id, self.status)
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleRemovedOutput {
    pub article_id: String,
    pub passages_removed: u64,
}

impl CommandOutput for ArticleRemovedOutput {
    fn to_human(&self) -> String {
        format!(
            "Removed article {} and {} passage(s)",
            self.article_id, self.passages_removed
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleListOutput {
    pub articles: Vec<ArticleRow>,
    #[serde(skip)]
    table: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: ArticleStatus,
    pub tags: Vec<String>,
    pub updated_at: String,
}

impl From<&Article> for ArticleRow {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            slug: article.slug.clone(),
            status: article.status,
            tags: article.tags.clone(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}

impl CommandOutput for ArticleListOutput {
    fn to_human(&self) -> String {
        if self.articles.is_empty() {
            return "No articles found.".to_string();
        }
        format!(
            "Articles:\n{}\n\nShowing {} article(s)",
            self.table,
            self.articles.len()
        )
    }
}

pub async fn execute(args: ArticleArgs, config: Config, json_mode: bool) -> Result<()> {
    let context = AppContext::open(config).await?;

    match args.command {
        ArticleCommands::Add {
            title,
            file,
            tags,
            status,
            id,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut article = Article::new(title, content)
                .with_tags(tags)
                .with_status(status.into());
            if let Some(id) = id {
                article = article.with_id(id);
            }

            let report = context
                .sync_service()?
                .save(&article)
                .await
                .context("Failed to save article")?;
            output(&saved_output(&article, report), json_mode);
        }
        ArticleCommands::Publish { id } => {
            let article = context
                .sync_service()?
                .set_status(&id, ArticleStatus::Published)
                .await
                .context("Failed to publish article")?;
            output(
                &StatusChangedOutput {
                    article_id: article.id,
                    status: article.status,
                },
                json_mode,
            );
        }
        ArticleCommands::Unpublish { id } => {
            let article = context
                .sync_service()?
                .set_status(&id, ArticleStatus::Draft)
                .await
                .context("Failed to unpublish article")?;
            output(
                &StatusChangedOutput {
                    article_id: article.id,
                    status: article.status,
                },
                json_mode,
            );
        }
        ArticleCommands::Remove { id } => {
            let passages_removed = context
                .sync_service()?
                .remove(&id)
                .await
                .context("Failed to remove article")?;
            output(
                &ArticleRemovedOutput {
                    article_id: id,
                    passages_removed,
                },
                json_mode,
            );
        }
        ArticleCommands::List { status } => {
            let articles = context
                .articles()
                .list(status.map(Into::into))
                .await
                .context("Failed to list articles")?;
            output(&list_output(&articles), json_mode);
        }
    }

    Ok(())
}

fn saved_output(article: &Article, report: SyncReport) -> ArticleSavedOutput {
    ArticleSavedOutput {
        article_id: report.article_id,
        slug: article.slug.clone(),
        status: article.status,
        passages: report.passages,
        embedded: report.embedded,
    }
}

fn list_output(articles: &[Article]) -> ArticleListOutput {
    ArticleListOutput {
        articles: articles.iter().map(ArticleRow::from).collect(),
        table: TableFormatter::new().format_articles(articles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_arg_conversion() {
        assert_eq!(ArticleStatus::from(StatusArg::Published), ArticleStatus::Published);
        assert_eq!(ArticleStatus::from(StatusArg::Draft), ArticleStatus::Draft);
    }

    #[test]
    fn test_list_output_json_omits_table() {
        let articles = vec![Article::new("Refund Policy", "body").with_id("a1").published()];
        let value = list_output(&articles).to_json();

        assert_eq!(value["articles"][0]["id"], "a1");
        assert_eq!(value["articles"][0]["status"], "published");
        assert_eq!(value["articles"][0]["slug"], "refund-policy");
        assert!(value.get("table").is_none());
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(list_output(&[]).to_human(), "No articles found.");
    }
}
