//! Paragraph-aware article chunking.
//!
//! Splits article bodies on blank lines and packs consecutive paragraphs
//! into passages under a word budget. Output is fully deterministic.

use anyhow::{anyhow, Result};

use crate::domain::models::ChunkingConfig;

/// Greedy paragraph packer
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker with the default 300..500 word bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new chunker with custom configuration
    pub fn with_config(config: ChunkingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid chunking config: {}", e))?;

        Ok(Self { config })
    }

    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into passage texts.
    ///
    /// A paragraph is flushed into a new passage when adding it would push
    /// the current passage over `max_words`. Oversized paragraphs are kept
    /// whole, and the final passage may fall under `min_words`.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut passages = Vec::new();
        let mut buffer: Vec<&str> = Vec::new();
        let mut buffer_words = 0;

        for paragraph in split_paragraphs(text) {
            if paragraph.trim().is_empty() {
                continue;
            }

            let words = word_count(paragraph);
            if buffer_words + words > self.config.max_words && !buffer.is_empty() {
                passages.push(buffer.join("\n\n"));
                buffer.clear();
                buffer_words = 0;
            }

            buffer.push(paragraph);
            buffer_words += words;
        }

        if !buffer.is_empty() {
            passages.push(buffer.join("\n\n"));
        }

        tracing::debug!(
            passages = passages.len(),
            max_words = self.config.max_words,
            "chunked article content"
        );

        passages
    }
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split on blank-line boundaries: a newline, optional whitespace, and a
/// later newline. Whitespace after the last newline of a boundary stays with
/// the following paragraph.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\n' {
            continue;
        }

        let mut last_newline = None;
        for (offset, next) in text[i + 1..].char_indices() {
            if !next.is_whitespace() {
                break;
            }
            if next == '\n' {
                last_newline = Some(i + 1 + offset);
            }
        }

        if let Some(boundary_end) = last_newline {
            paragraphs.push(&text[start..i]);
            start = boundary_end + 1;
            while chars.next_if(|&(k, _)| k <= boundary_end).is_some() {}
        }
    }

    paragraphs.push(&text[start..]);
    paragraphs
}
