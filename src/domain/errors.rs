//! Domain errors for the Deflector resolution engine.

use thiserror::Error;

/// Domain-level errors that can occur in the Deflector system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Provider request failed: {0}")]
    ProviderFailed(String),

    #[error("Provider timed out after {0} seconds")]
    ProviderTimeout(u64),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DomainError::ProviderFailed(format!("request timed out: {err}"))
        } else {
            DomainError::ProviderFailed(err.to_string())
        }
    }
}

impl DomainError {
    /// Whether the error came from an external embedding/generation provider.
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::ProviderFailed(_) | Self::ProviderTimeout(_)
        )
    }
}
