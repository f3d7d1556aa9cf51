//! Hybrid (dense + BM25 + symbol-aware) retrieval and ranking for PAMPA.
//!
//! [`hybrid::search`] is the entry point: scope-filter a chunk set,
//! score it densely, optionally boost by symbol/signature match and
//! fuse with BM25 via Reciprocal Rank Fusion, then optionally rerank
//! the head with a cross-encoder. Every optional stage is fail-soft.

pub mod bm25;
pub mod dense;
pub mod error;
pub mod hybrid;
pub mod reranker;
pub mod result;
pub mod rrf;
pub mod symbol_boost;

pub use bm25::{Bm25Document, Bm25Index};
pub use error::SearchError;
pub use hybrid::{HybridSearchDiagnostics, HybridSearchInput, HybridSearchOutput};
pub use reranker::{CrossEncoderReranker, UnavailableReranker};
pub use result::{SearchResult, SearchType};
