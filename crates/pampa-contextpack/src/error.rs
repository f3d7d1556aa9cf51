//! Error types for context-pack loading, validation, and activation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextPackError {
    #[error("io error at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("pack {name} failed schema validation: {errors:?}")]
    Invalid { name: String, errors: Vec<String> },

    #[error("pack {0} not found")]
    NotFound(String),
}
