pub mod article;
pub mod chunking;
pub mod config;
pub mod passage;
pub mod resolution;

pub use article::{slugify, Article, ArticleStatus, ArticleSummary};
pub use chunking::ChunkingConfig;
pub use config::{
    CompletionAttemptConfig, Config, DatabaseConfig, EmbeddingConfig, GenerationConfig,
    LoggingConfig, ProviderKind, ProvidersConfig, ResolutionConfig,
};
pub use passage::{passage_id, Passage, PassageDraft, PassageWithArticle, RankedPassage};
pub use resolution::{
    AnswerMessage, AnswerSection, ResolutionResult, StructuredAnswer, EMPTY_QUESTION_MESSAGE,
    NO_MATCH_MESSAGE, UNEXPECTED_ERROR_MESSAGE, UNPRESENTABLE_MESSAGE,
};
