//! Resolution services: chunking, ranking, formatting and orchestration.

pub mod article_sync;
pub mod chunker;
pub mod completion_chain;
pub mod embedding_service;
pub mod lexical_matcher;
pub mod resolution_orchestrator;
pub mod response_formatter;
pub mod vector_ranker;

pub use article_sync::{ArticleSyncService, ReembedReport, SyncReport};
pub use chunker::Chunker;
pub use completion_chain::{CompletionAttempt, CompletionChain, CompletionError};
pub use embedding_service::EmbeddingService;
pub use lexical_matcher::{LexicalMatcher, LexicalOutcome};
pub use resolution_orchestrator::{Inspection, LegacyReason, ResolutionOrchestrator, Route};
pub use vector_ranker::{cosine_similarity, VectorError, VectorRanker};
