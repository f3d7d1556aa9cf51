//! # pampa-core
//!
//! Core types shared across every PAMPA crate: the [`CodeChunk`] entity,
//! the supported [`Language`]/[`ChunkType`] tables, search [`Scope`]
//! filters, and the cross-cutting [`CoreError`] type.
//!
//! Domain-specific errors (store, db, search, ...) live in their own
//! crates; `CoreError` only covers failures that can originate anywhere
//! (bad identity, validation).

pub mod chunk;
pub mod errors;
pub mod ids;
pub mod language;
pub mod scope;

pub use chunk::{ChunkType, CodeChunk, ImportantVariable};
pub use errors::CoreError;
pub use language::Language;
pub use scope::{Reranker, Scope, ScopeOverrides};
