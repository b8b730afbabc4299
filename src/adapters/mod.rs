//! Adapters for external systems: SQLite storage and HTTP model providers.

pub mod completions;
pub mod embeddings;
pub mod http;
pub mod registry;
pub mod sqlite;

pub use registry::ProviderRegistry;
