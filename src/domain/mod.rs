//! Domain layer for the Deflector resolution engine
//!
//! This module contains core models, port traits and domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
