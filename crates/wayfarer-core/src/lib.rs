//! Wayfarer Core Library
//!
//! Domain models, error types, configuration and field validation shared by every
//! Wayfarer crate.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, DocumentStoreKind, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
