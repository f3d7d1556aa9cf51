//! Cross-cutting error types for PAMPA.
//!
//! Errors that can be raised by more than one crate live here. Domain
//! errors (`StoreError`, `DatabaseError`, `SearchError`, ...) are defined
//! in their own crates and converge into `PampaError` in the top-level
//! `pampa` crate.

use thiserror::Error;

/// Errors that can be raised by any PAMPA crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value failed a basic invariant check (empty symbol, bad chunk id, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A file extension has no known language mapping.
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}
