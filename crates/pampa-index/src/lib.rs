//! # pampa-index
//!
//! The incremental indexer: Merkle-based change detection, the
//! version-controllable codemap, a full-tree file walker, and the
//! orchestrator tying extraction, embedding, chunk storage, and the
//! embedding store together into one `indexProject` run.

pub mod codemap;
pub mod error;
pub mod merkle;
pub mod orchestrator;
pub mod walker;

pub use codemap::{Codemap, CodemapRecord};
pub use error::{IndexError, RunError, RunErrorKind};
pub use merkle::{MerkleFileEntry, MerkleMap, fast_hash};
pub use orchestrator::{EncryptPreference, IndexOutcome, IndexProgress, IndexRequest, index_project, resolve_encryption};
pub use walker::{IGNORED_DIRS, walk_source_files};
