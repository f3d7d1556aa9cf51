//! The result shape emitted by a hybrid search.

use serde::{Deserialize, Serialize};

/// Which retrieval path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Vector,
    Hybrid,
    Intention,
}

/// One ranked search result, with every scoring stage's contribution
/// kept visible for debugging and for the testable-property suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: String,
    pub sha: String,
    /// Final score, clamped to `1.0`.
    pub score: f32,
    /// Uncapped score, present only when `score` was clamped.
    pub score_raw: Option<f32>,
    pub vector_score: f32,
    pub hybrid_score: Option<f32>,
    pub bm25_score: Option<f32>,
    pub reranker_score: Option<f32>,
    pub symbol_boost: f32,
    pub search_type: SearchType,
}

impl SearchResult {
    /// Build a result from an unclamped final score, splitting it into
    /// `score`/`score_raw` per the §4.7 clamping rule.
    #[must_use]
    pub fn new(
        chunk_id: String,
        sha: String,
        final_score: f32,
        vector_score: f32,
        hybrid_score: Option<f32>,
        bm25_score: Option<f32>,
        symbol_boost: f32,
        search_type: SearchType,
    ) -> Self {
        let score_raw = if final_score > 1.0 { Some(final_score) } else { None };
        Self {
            chunk_id,
            sha,
            score: final_score.min(1.0),
            score_raw,
            vector_score,
            hybrid_score,
            bm25_score,
            reranker_score: None,
            symbol_boost,
            search_type,
        }
    }
}
