//! Intermediate types produced by extraction, before embedding.

use pampa_core::{ChunkType, ImportantVariable, Language};
use serde::{Deserialize, Serialize};

/// A chunk candidate plus all metadata the extractor and enricher could
/// harvest from the source, prior to embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedChunk {
    pub lang: Language,
    pub chunk_type: ChunkType,
    pub symbol: String,
    pub code: String,
    pub start_line: u32,
    pub end_line: u32,

    pub doc_comment: Option<String>,
    pub tags: Vec<String>,
    pub intent: Option<String>,
    pub description: Option<String>,
    pub variables: Vec<ImportantVariable>,
    pub calls: Vec<String>,

    pub signature: String,
    pub parameters: Vec<String>,
    pub return_type: Option<String>,
}
