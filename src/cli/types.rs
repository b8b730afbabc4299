//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::article::ArticleArgs;
use super::commands::ask::AskArgs;
use super::commands::chunk::ChunkArgs;
use super::commands::init::InitArgs;
use super::commands::reindex::ReindexArgs;
use super::commands::search::SearchArgs;

#[derive(Parser, Debug)]
#[command(name = "deflector")]
#[command(about = "Deflector - answer support questions from the knowledge base", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .deflector/
    #[arg(long, global = true, env = "DEFLECTOR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write default configuration and create the database
    Init(InitArgs),

    /// Answer a question from the published articles
    Ask(AskArgs),

    /// Manage knowledge-base articles
    Article(ArticleArgs),

    /// Show vector and lexical scores for a question
    Search(SearchArgs),

    /// Re-embed every stored passage
    Reindex(ReindexArgs),

    /// Preview how a file is split into passages
    Chunk(ChunkArgs),
}
