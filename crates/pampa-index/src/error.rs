//! Error types for the index/update orchestrator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("io error at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("merkle map corrupt: {0}")]
    MerkleCorrupt(String),

    #[error("codemap corrupt: {0}")]
    CodemapCorrupt(String),

    #[error("embedding provider returned no vector for chunk")]
    EmptyEmbedding,

    #[error(transparent)]
    Store(#[from] pampa_store::StoreError),

    #[error(transparent)]
    Database(#[from] pampa_db::DatabaseError),

    #[error(transparent)]
    Embedding(#[from] pampa_embeddings::EmbeddingError),

    #[error(transparent)]
    Parser(#[from] pampa_parser::ParserError),
}

/// Per-file or per-chunk failure captured during a run rather than
/// aborting it (original spec §7 propagation policy).
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunError {
    pub file_path: String,
    pub kind: RunErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorKind {
    /// Per-file parse failure, recovered with a whole-file fallback chunk.
    ProcessingError,
    /// Per-chunk embed/store failure.
    IndexingError,
    /// Even the fallback chunk failed; the file was skipped entirely.
    FallbackError,
}
