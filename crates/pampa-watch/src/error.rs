//! Watcher error types.

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to start filesystem watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Index(#[from] pampa_index::IndexError),

    #[error("embedding provider unavailable: {0}")]
    Provider(#[from] pampa_embeddings::EmbeddingError),
}
