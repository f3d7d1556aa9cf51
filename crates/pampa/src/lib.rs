//! PAMPA: a per-project code-memory and hybrid semantic search engine
//! for AI coding agents.
//!
//! This crate composes the lower-level `pampa-*` crates into the
//! operations an agent-facing surface (CLI, MCP server, or a direct
//! embedder) actually calls: indexing a repository incrementally,
//! hybrid search with an intention cache and learning feedback loop,
//! context-pack scope management, and a debounced file watcher that
//! keeps the index warm as files change.

pub mod config;
pub mod contextpack;
pub mod error;
pub mod index;
pub mod intention;
pub mod overview;
pub mod project_db;
pub mod search;
pub mod tracing_init;
pub mod watch;

pub use config::PampaConfig;
pub use error::PampaError;
pub use index::{EncryptPreference, IndexOutcome, IndexProgress, IndexProjectRequest, index_project};
pub use intention::{get_query_analytics, mask_pattern, normalize_query, record_intention, record_query_pattern, search_by_intention};
pub use overview::{ChunkErrorKind, ChunkOutcome, OverviewErrorKind, OverviewOutcome, get_chunk, get_overview};
pub use search::{
    HybridDiagnostics, SearchErrorKind, SearchFailure, SearchOutcome, SearchRequest, SearchSuccess, SymbolBoostDiagnostics, search_code,
};
pub use watch::{StartWatchRequest, WatchHandle, start_watch};

pub use pampa_core::{Scope, ScopeOverrides};
pub use pampa_search::SearchType;
