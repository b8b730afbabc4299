use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;

/// Main configuration structure for Deflector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Article chunking bounds
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Thresholds and boosts for answer resolution
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Embedding and text-generation providers
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".deflector/deflector.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files; stdout/stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// How often the log file rolls over: `daily`, `hourly` or `never`
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Confidence thresholds and lexical boosts.
///
/// The defaults are the empirically chosen values the knowledge base was
/// tuned with; they are exposed as configuration rather than re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolutionConfig {
    /// Minimum cosine similarity for the generated-answer path
    #[serde(default = "default_vector_threshold")]
    pub vector_threshold: f32,

    /// Minimum keyword-overlap score for the legacy path
    #[serde(default = "default_lexical_threshold")]
    pub lexical_threshold: f32,

    /// Added when the article title contains the whole query
    #[serde(default = "default_title_boost")]
    pub title_boost: f32,

    /// Added when the passage text contains the whole query
    #[serde(default = "default_text_boost")]
    pub text_boost: f32,

    /// Passages handed to the generator as context
    #[serde(default = "default_vector_top_k")]
    pub vector_top_k: usize,
}

const fn default_vector_threshold() -> f32 {
    0.4
}

const fn default_lexical_threshold() -> f32 {
    0.5
}

const fn default_title_boost() -> f32 {
    0.2
}

const fn default_text_boost() -> f32 {
    0.1
}

const fn default_vector_top_k() -> usize {
    2
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            vector_threshold: default_vector_threshold(),
            lexical_threshold: default_lexical_threshold(),
            title_boost: default_title_boost(),
            text_boost: default_text_boost(),
            vector_top_k: default_vector_top_k(),
        }
    }
}

/// Which backend serves a provider slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Generative Language API
    Gemini,
    /// `OpenAI`-compatible API (`OpenAI`, `OpenRouter`, local servers)
    #[serde(rename = "openai")]
    OpenAi,
    /// Disabled; embeddings are always unavailable
    None,
}

impl ProviderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::None => "none",
        }
    }
}

/// Embedding and generation provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ProvidersConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_kind")]
    pub kind: ProviderKind,

    /// Model override; each adapter has its own default
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key; falls back to the adapter's environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,

    /// Ceiling for bulk re-embedding runs
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

const fn default_embedding_kind() -> ProviderKind {
    ProviderKind::Gemini
}

const fn default_embedding_timeout_secs() -> u64 {
    15
}

const fn default_requests_per_second() -> u32 {
    5
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            kind: default_embedding_kind(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: default_embedding_timeout_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Text-generation configuration: shared sampling settings plus an ordered
/// list of provider attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Tried in order; the first non-empty answer wins
    #[serde(default = "default_attempts")]
    pub attempts: Vec<CompletionAttemptConfig>,
}

const fn default_max_tokens() -> u32 {
    250
}

const fn default_temperature() -> f32 {
    0.7
}

fn default_attempts() -> Vec<CompletionAttemptConfig> {
    vec![
        CompletionAttemptConfig::new(ProviderKind::Gemini, None),
        CompletionAttemptConfig::new(
            ProviderKind::OpenAi,
            Some("meta-llama/llama-3.1-70b-instruct:free"),
        ),
        CompletionAttemptConfig::new(
            ProviderKind::OpenAi,
            Some("nousresearch/hermes-3-llama-3.1-405b:free"),
        ),
    ]
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            attempts: default_attempts(),
        }
    }
}

/// One entry in the generation fallback list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletionAttemptConfig {
    pub kind: ProviderKind,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_generation_timeout_secs() -> u64 {
    30
}

impl CompletionAttemptConfig {
    pub fn new(kind: ProviderKind, model: Option<&str>) -> Self {
        Self {
            kind,
            model: model.map(str::to_string),
            base_url: None,
            api_key: None,
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}
