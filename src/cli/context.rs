//! Wiring shared by the commands that touch the knowledge base.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{initialize_from_config, SqliteArticleRepository, SqlitePassageStore};
use crate::adapters::ProviderRegistry;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ArticleSyncService, Chunker, EmbeddingService, ResolutionOrchestrator};

/// Load the hierarchical config, or a single file when `--config` is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Open database plus provider registry for one command invocation.
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    articles: Arc<SqliteArticleRepository>,
    passages: Arc<SqlitePassageStore>,
    registry: ProviderRegistry,
}

impl AppContext {
    /// Open (and migrate) the configured database.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = initialize_from_config(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;

        Ok(Self::with_pool(config, pool))
    }

    /// Build over an existing pool; tests pass an in-memory one.
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            articles: Arc::new(SqliteArticleRepository::new(pool.clone())),
            passages: Arc::new(SqlitePassageStore::new(pool.clone())),
            registry: ProviderRegistry::new(config.providers.clone()),
            config,
            pool,
        }
    }

    pub fn articles(&self) -> Arc<SqliteArticleRepository> {
        Arc::clone(&self.articles)
    }

    pub fn embedding_service(&self) -> Arc<EmbeddingService> {
        Arc::new(self.registry.embedding_service())
    }

    pub fn orchestrator(&self) -> ResolutionOrchestrator {
        ResolutionOrchestrator::new(
            self.passages.clone(),
            self.embedding_service(),
            self.registry.completion_chain(),
            self.config.resolution.clone(),
        )
    }

    pub fn sync_service(&self) -> Result<ArticleSyncService> {
        let chunker = Chunker::with_config(self.config.chunking.clone())?;
        Ok(ArticleSyncService::new(
            self.articles.clone(),
            self.passages.clone(),
            self.embedding_service(),
            chunker,
        ))
    }
}
