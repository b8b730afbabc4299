//! Text chunking domain models
//!
//! Articles are split into passages on paragraph boundaries, bounded by a
//! word budget so each passage stays a useful unit for ranking and embedding.

use serde::{Deserialize, Serialize};

/// Configuration for article chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Target lower bound in words. Informational only: the last passage of
    /// an article may be shorter.
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Flush threshold in words. A single paragraph longer than this is kept
    /// whole.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

const fn default_min_words() -> usize {
    300
}

const fn default_max_words() -> usize {
    500
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_words: default_max_words(),
        }
    }
}

impl ChunkingConfig {
    pub const fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words,
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_words == 0 {
            return Err("max_words must be greater than 0".to_string());
        }

        if self.min_words > self.max_words {
            return Err(format!(
                "min_words ({}) must not exceed max_words ({})",
                self.min_words, self.max_words
            ));
        }

        Ok(())
    }
}
