//! # pampa-parser
//!
//! Chunk extraction and metadata enrichment: given a source file's
//! text and detected [`pampa_core::Language`], produce the ordered
//! list of [`ExtractedChunk`] candidates that `pampa-index` turns into
//! [`pampa_core::CodeChunk`] rows.
//!
//! Extraction walks an ast-grep parse tree for node kinds configured
//! per language in [`lang_table`]; a file that yields no chunk nodes
//! (unparseable content, or a language whose grammar doesn't recognize
//! any declaration in it) falls back to a single whole-file chunk so
//! indexing never silently drops a file.

pub mod ast;
pub mod enrich;
pub mod error;
pub mod extractor;
pub mod lang_table;
pub mod symbol;
pub mod types;

pub use error::ParserError;
pub use extractor::extract;
pub use types::ExtractedChunk;
