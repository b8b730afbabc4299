//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - `EmbeddingProvider`: text → dense vector
//! - `CompletionProvider`: chat transcript → answer text
//! - `PassageStore`: passage persistence and the published view
//! - `ArticleRepository`: article records passages are joined against
//!
//! These traits keep the resolution core independent of any particular
//! provider or storage technology.

pub mod article_repository;
pub mod completion;
pub mod embedding;
pub mod null_embedding;
pub mod passage_store;

pub use article_repository::ArticleRepository;
pub use completion::{ChatMessage, ChatRole, CompletionOptions, CompletionProvider};
pub use embedding::EmbeddingProvider;
pub use null_embedding::NullEmbeddingProvider;
pub use passage_store::PassageStore;
