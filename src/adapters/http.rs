//! Shared reqwest plumbing for provider adapters.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::domain::errors::{DomainError, DomainResult};

/// Build an HTTP client with a whole-request timeout.
pub fn build_client(timeout_secs: u64) -> DomainResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DomainError::ProviderUnavailable(format!("Failed to build HTTP client: {e}")))
}

/// Resolve an API key from config, falling back to an environment variable.
pub fn api_key_or_env(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
}

/// Turn a non-success response into an error and parse a success body.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> DomainResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(DomainError::ProviderFailed(format!("{what} returned {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| DomainError::SerializationError(format!("Failed to parse {what} response: {e}")))
}
