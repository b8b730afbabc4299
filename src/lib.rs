//! Deflector - support-question deflection engine
//!
//! Answers customer questions from a knowledge base of articles before they
//! become support tickets. Articles are chunked into passages; a question is
//! matched semantically (embeddings plus a generated, grounded answer) or
//! lexically (keyword overlap plus a structured digest), and always ends in
//! exactly one answer or fallback.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, port traits and errors
//! - **Service Layer** (`services`): chunking, ranking, formatting, orchestration
//! - **Adapters** (`adapters`): SQLite storage and HTTP model providers
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use deflector::adapters::{sqlite, ProviderRegistry};
//! use deflector::services::ResolutionOrchestrator;
//!
//! let config = deflector::ConfigLoader::load()?;
//! let pool = sqlite::initialize_from_config(&config.database).await?;
//! let registry = ProviderRegistry::new(config.providers.clone());
//! let orchestrator = ResolutionOrchestrator::new(
//!     Arc::new(sqlite::SqlitePassageStore::new(pool)),
//!     Arc::new(registry.embedding_service()),
//!     registry.completion_chain(),
//!     config.resolution,
//! );
//! let result = orchestrator.resolve("How do refunds work?").await;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AnswerMessage, Article, ArticleStatus, Config, ResolutionResult, StructuredAnswer,
};
pub use domain::ports::{ArticleRepository, CompletionProvider, EmbeddingProvider, PassageStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Chunker, LexicalMatcher, ResolutionOrchestrator, VectorRanker};
