//! Error types for hybrid retrieval.

use thiserror::Error;

/// Errors from the search pipeline.
///
/// Most stages (BM25, reranker, symbol boost) degrade gracefully rather
/// than raising one of these — see the `*_soft` helpers in [`crate::hybrid`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no chunks indexed for provider {provider:?} dimensions {dimensions}")]
    NoChunksFound { provider: String, dimensions: u32 },

    #[error("no chunks matched the given scope and query")]
    NoRelevantMatches,

    #[error("query embedding has {got} dimensions, expected {expected}")]
    DimensionMismatch { got: usize, expected: usize },
}
