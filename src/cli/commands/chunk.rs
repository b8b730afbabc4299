//! Implementation of the `deflector chunk` command: preview how a file splits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ChunkingConfig, Config};
use crate::services::chunker::{word_count, Chunker};

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// File to split into passages
    #[arg(long)]
    pub file: PathBuf,

    /// Flush threshold in words (defaults to chunking.max_words)
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Target lower bound in words (defaults to chunking.min_words)
    #[arg(long)]
    pub min_words: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChunkPreview {
    pub index: usize,
    pub words: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    pub max_words: usize,
    pub min_words: usize,
    pub passages: Vec<ChunkPreview>,
}

impl CommandOutput for ChunkOutput {
    fn to_human(&self) -> String {
        if self.passages.is_empty() {
            return "No passages (file has no text).".to_string();
        }

        let mut lines = vec![format!(
            "{} passage(s), max {} words:",
            self.passages.len(),
            self.max_words
        )];
        for passage in &self.passages {
            lines.push(format!("\n--- passage {} ({} words) ---", passage.index, passage.words));
            lines.push(passage.text.clone());
        }
        lines.join("\n")
    }
}

pub fn preview(content: &str, config: ChunkingConfig) -> Result<ChunkOutput> {
    let chunker = Chunker::with_config(config)?;
    let passages = chunker
        .chunk(content)
        .into_iter()
        .enumerate()
        .map(|(index, text)| ChunkPreview {
            index,
            words: word_count(&text),
            text,
        })
        .collect();

    Ok(ChunkOutput {
        max_words: chunker.config().max_words,
        min_words: chunker.config().min_words,
        passages,
    })
}

pub async fn execute(args: ChunkArgs, config: Config, json_mode: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let chunking = ChunkingConfig::new(
        args.min_words.unwrap_or(config.chunking.min_words),
        args.max_words.unwrap_or(config.chunking.max_words),
    );

    output(&preview(&content, chunking)?, json_mode);
    Ok(())
}
