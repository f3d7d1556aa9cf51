//! The [`CodeChunk`] entity: the atomic indexed unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// What kind of source construct a chunk represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Function,
    Method,
    Class,
    /// Whole-file fallback chunk, produced when the extractor cannot
    /// parse the file at all.
    File,
}

impl ChunkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable judged "important" by the enrichment heuristics in
/// `pampa-parser` (config/secret-shaped names, `ALL_CAPS` constants, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantVariable {
    pub name: String,
    /// Value text, truncated to at most 100 chars.
    pub value: String,
}

/// A single indexed code chunk: identity, content hash, language/kind,
/// the embedding, and the semantic metadata harvested by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChunk {
    pub chunk_id: String,
    pub file_path: String,
    pub symbol: String,
    /// Lowercase hex SHA-1 of `code`.
    pub sha: String,
    pub lang: Language,
    pub chunk_type: ChunkType,

    pub embedding_provider: String,
    pub embedding_dimensions: u32,
    pub embedding: Vec<f32>,

    pub tags: Vec<String>,
    pub intent: Option<String>,
    pub description: Option<String>,
    pub doc_comments: Option<String>,
    pub variables: Vec<ImportantVariable>,
    pub context_info: Option<serde_json::Value>,

    pub signature: Option<String>,
    pub parameters: Vec<String>,
    pub return_type: Option<String>,

    /// Outgoing call names, as extracted from the chunk body (not yet
    /// resolved to shas).
    pub calls: Vec<String>,
    /// Outgoing call targets, resolved to callee shas where known.
    pub call_targets: Vec<String>,
    /// Shas of chunks observed calling this one.
    pub callers: Vec<String>,
    /// Union of `call_targets` + `callers`, capped to the first 32 shas.
    pub symbol_neighbors: Vec<String>,

    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CodeChunk {
    /// `(provider, dimensions)` pair used to keep embeddings comparable.
    #[must_use]
    pub fn provider_key(&self) -> (&str, u32) {
        (self.embedding_provider.as_str(), self.embedding_dimensions)
    }

    /// Recompute `symbol_neighbors` from `call_targets` ∪ `callers`,
    /// capped at the first 32 entries in insertion order.
    pub fn rebuild_neighbors(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let mut neighbors = Vec::new();
        for sha in self.call_targets.iter().chain(self.callers.iter()) {
            if neighbors.len() >= 32 {
                break;
            }
            if seen.insert(sha.clone()) {
                neighbors.push(sha.clone());
            }
        }
        self.symbol_neighbors = neighbors;
    }
}
