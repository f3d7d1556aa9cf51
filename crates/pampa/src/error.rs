//! The top-level error type, converging every domain crate's error into
//! one `Result` for callers of the public API.
//!
//! Most of the structured, non-throwing states the API describes
//! (`database_not_found`, `no_chunks_found`, ...) are carried in the
//! `Ok` side of a call's own result type instead of here — see
//! [`crate::search::SearchOutcome`] and [`crate::overview::OverviewOutcome`].
//! `PampaError` is reserved for failures a caller can't recover from by
//! inspecting a result value: corrupt on-disk state, I/O failures, a
//! misconfigured encryption key.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PampaError {
    #[error(transparent)]
    Parser(#[from] pampa_parser::ParserError),

    #[error(transparent)]
    Store(#[from] pampa_store::StoreError),

    #[error(transparent)]
    Database(#[from] pampa_db::DatabaseError),

    #[error(transparent)]
    Embedding(#[from] pampa_embeddings::EmbeddingError),

    #[error(transparent)]
    Search(#[from] pampa_search::SearchError),

    #[error(transparent)]
    Index(#[from] pampa_index::IndexError),

    #[error(transparent)]
    ContextPack(#[from] pampa_contextpack::ContextPackError),

    #[error(transparent)]
    Watch(#[from] pampa_watch::WatchError),

    #[error("config error: {0}")]
    Config(#[from] figment::Error),
}
