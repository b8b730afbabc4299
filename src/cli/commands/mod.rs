//! CLI command implementations.

pub mod article;
pub mod ask;
pub mod chunk;
pub mod init;
pub mod reindex;
pub mod search;
