use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding project-local configuration and the default database.
pub const CONFIG_DIR: &str = ".deflector";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid chunking bounds: {0}")]
    InvalidChunking(String),

    #[error("Invalid {name}: {value}. Must be between 0.0 and 1.0")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("Invalid vector_top_k: must be at least 1")]
    InvalidTopK,

    #[error("Invalid {0}: timeout must be at least 1 second")]
    ZeroTimeout(String),

    #[error("Invalid requests_per_second: must be at least 1")]
    InvalidRequestsPerSecond,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .deflector/config.yaml (project config, created by init)
    /// 3. .deflector/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DEFLECTOR_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed("DEFLECTOR_").split("__"))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Render the defaults as the YAML written by `init`.
    pub fn default_yaml() -> Result<String> {
        serde_yaml::to_string(&Config::default()).context("Failed to render default configuration")
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        config.chunking.validate().map_err(ConfigError::InvalidChunking)?;

        let resolution = &config.resolution;
        for (name, value) in [
            ("vector_threshold", resolution.vector_threshold),
            ("lexical_threshold", resolution.lexical_threshold),
            ("title_boost", resolution.title_boost),
            ("text_boost", resolution.text_boost),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if resolution.vector_top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }

        let embedding = &config.providers.embedding;
        if embedding.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("providers.embedding".to_string()));
        }
        if embedding.requests_per_second == 0 {
            return Err(ConfigError::InvalidRequestsPerSecond);
        }

        let generation = &config.providers.generation;
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "temperature {} must be between 0.0 and 2.0",
                generation.temperature
            )));
        }
        if generation.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        for (index, attempt) in generation.attempts.iter().enumerate() {
            if attempt.timeout_secs == 0 {
                return Err(ConfigError::ZeroTimeout(format!(
                    "providers.generation.attempts[{index}]"
                )));
            }
        }

        Ok(())
    }
}
