//! Infrastructure layer module
//!
//! Process-wide concerns that sit outside the domain: configuration loading
//! and the tracing subscriber.

pub mod config;
pub mod logging;
