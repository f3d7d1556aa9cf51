//! Embedding error types.

/// Errors that can occur during embedding generation.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model initialization failed: {0}")]
    InitFailed(String),

    #[error("embedding generation failed: {0}")]
    EmbedFailed(String),

    #[error("empty result from embedding model")]
    EmptyResult,

    #[error("provider {0} not implemented; set the uniform contract's env var for {0} or use 'local'")]
    NotImplemented(String),

    #[error("unknown embedding provider: {0}")]
    UnknownProvider(String),
}
