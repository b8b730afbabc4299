//! Implementation of the `deflector search` command: both rankings side by side.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, single_line, truncate, CommandOutput};
use crate::domain::models::{Config, RankedPassage};
use crate::services::Inspection;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Question to score against the published passages
    pub question: String,

    /// Rows shown per ranking
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoredPassage {
    pub article_id: String,
    pub article_title: String,
    pub passage_id: String,
    pub score: f32,
    pub excerpt: String,
}

impl From<&RankedPassage> for ScoredPassage {
    fn from(ranked: &RankedPassage) -> Self {
        Self {
            article_id: ranked.passage.article.id.clone(),
            article_title: ranked.passage.article.title.clone(),
            passage_id: ranked.passage.passage.id.clone(),
            score: ranked.score,
            excerpt: truncate(&single_line(&ranked.passage.passage.text), 120),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub question: String,
    pub embedding_available: bool,
    pub vector: Vec<ScoredPassage>,
    pub lexical: Vec<ScoredPassage>,
    #[serde(skip)]
    vector_table: String,
    #[serde(skip)]
    lexical_table: String,
}

impl SearchOutput {
    fn new(question: String, inspection: &Inspection) -> Self {
        let formatter = TableFormatter::new();
        Self {
            question,
            embedding_available: inspection.embedding_available,
            vector: inspection.vector.iter().map(ScoredPassage::from).collect(),
            lexical: inspection.lexical.iter().map(ScoredPassage::from).collect(),
            vector_table: formatter.format_ranking(&inspection.vector),
            lexical_table: formatter.format_ranking(&inspection.lexical),
        }
    }
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Question: {}", self.question)];

        lines.push("\nVector ranking:".to_string());
        if !self.embedding_available {
            lines.push("  (embeddings unavailable)".to_string());
        } else if self.vector.is_empty() {
            lines.push("  (no embedded passages)".to_string());
        } else {
            lines.push(self.vector_table.clone());
        }

        lines.push("\nLexical ranking:".to_string());
        if self.lexical.is_empty() {
            lines.push("  (no published passages)".to_string());
        } else {
            lines.push(self.lexical_table.clone());
        }

        lines.join("\n")
    }
}

pub async fn execute(args: SearchArgs, config: Config, json_mode: bool) -> Result<()> {
    let context = AppContext::open(config).await?;
    let inspection = context
        .orchestrator()
        .inspect(&args.question, args.top_k.max(1))
        .await
        .context("Failed to rank passages")?;

    output(&SearchOutput::new(args.question, &inspection), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Article, Passage, PassageWithArticle};

    fn ranked(score: f32) -> RankedPassage {
        let article = Article::new("Refund Policy", "").with_id("a1");
        RankedPassage {
            passage: PassageWithArticle {
                passage: Passage::new("a1", 0, "All sales\nare final.").with_embedding(vec![1.0, 0.0]),
                article: article.summary(),
            },
            score,
        }
    }

    #[test]
    fn test_json_rows_drop_embeddings() {
        let inspection = Inspection {
            embedding_available: true,
            vector: vec![ranked(0.9)],
            lexical: vec![ranked(1.2)],
        };

        let value = SearchOutput::new("refund".to_string(), &inspection).to_json();
        assert_eq!(value["vector"][0]["passage_id"], "a1:chunk:0");
        assert_eq!(value["lexical"][0]["excerpt"], "All sales are final.");
        assert!(value["vector"][0].get("embedding").is_none());
        assert!(value.get("vector_table").is_none());
    }

    #[test]
    fn test_human_notes_missing_embeddings() {
        let inspection = Inspection {
            embedding_available: false,
            vector: vec![],
            lexical: vec![],
        };

        let human = SearchOutput::new("refund".to_string(), &inspection).to_human();
        assert!(human.contains("(embeddings unavailable)"));
        assert!(human.contains("(no published passages)"));
    }
}
