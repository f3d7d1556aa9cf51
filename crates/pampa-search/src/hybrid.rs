//! Hybrid retrieval and ranking: scope filtering, dense scoring, optional
//! symbol boost, optional BM25 fusion via RRF, optional cross-encoder
//! rerank. Every optional stage degrades gracefully on failure.

use std::collections::HashMap;

use pampa_core::{CodeChunk, Scope};

use crate::bm25::{Bm25Document, Bm25Index};
use crate::dense::dense_score;
use crate::error::SearchError;
use crate::reranker::{CrossEncoderReranker, rerank_top};
use crate::result::{SearchResult, SearchType};
use crate::rrf::fuse;
use crate::symbol_boost::symbol_boost;

/// Inputs to a single hybrid search pass, after intention-cache lookup
/// has already resolved any direct hit.
pub struct HybridSearchInput<'a> {
    pub query_normalized: &'a str,
    pub query_embedding: &'a [f32],
    pub scope: &'a Scope,
    pub provider: &'a str,
    pub dimensions: u32,
    /// How many results the caller still wants after any intention hit.
    pub remaining_slots: usize,
    /// Shas already surfaced by the intention cache, excluded here to
    /// avoid duplicate results.
    pub exclude_shas: &'a [String],
}

/// Diagnostics describing which optional stages actually ran, mirrored
/// in the public core API's `hybrid`/`reranker`/`symbolBoost` fields.
#[derive(Debug, Clone, Default)]
pub struct HybridSearchDiagnostics {
    pub hybrid_enabled: bool,
    pub bm25_enabled: bool,
    pub fused: bool,
    pub bm25_candidates: usize,
    pub reranker_requested: bool,
    pub reranker_applied: bool,
    pub symbol_boost_enabled: bool,
    pub boosted: bool,
}

/// Full hybrid search output.
pub struct HybridSearchOutput {
    pub results: Vec<SearchResult>,
    pub diagnostics: HybridSearchDiagnostics,
}

const MIN_SELECTION_BUDGET: usize = 60;

fn build_reranker_document(chunk: &CodeChunk, code_text: &str) -> String {
    let mut parts = vec![chunk.symbol.clone()];
    if let Some(ref sig) = chunk.signature {
        parts.push(sig.clone());
    }
    if let Some(ref description) = chunk.description {
        parts.push(description.clone());
    }
    parts.push(code_text.to_string());
    parts.join("\n")
}

/// Run the §4.7 hybrid retrieval pipeline over `chunks`. Callers are
/// responsible for intention-cache lookup beforehand; `code_text`
/// resolves a chunk's sha to its stored code text, used for BM25
/// documents and the reranker's candidate text.
pub fn search<F>(
    chunks: &[CodeChunk],
    code_text: F,
    reranker: Option<&dyn CrossEncoderReranker>,
    input: &HybridSearchInput<'_>,
) -> Result<HybridSearchOutput, SearchError>
where
    F: Fn(&str) -> Option<String>,
{
    let scoped_by_provider: Vec<&CodeChunk> = chunks
        .iter()
        .filter(|c| c.embedding_provider == input.provider && c.embedding_dimensions == input.dimensions)
        .collect();
    if scoped_by_provider.is_empty() {
        return Err(SearchError::NoChunksFound {
            provider: input.provider.to_string(),
            dimensions: input.dimensions,
        });
    }

    let exclude: std::collections::HashSet<&str> = input.exclude_shas.iter().map(String::as_str).collect();
    let survivors: Vec<&CodeChunk> = scoped_by_provider
        .into_iter()
        .filter(|c| !exclude.contains(c.sha.as_str()))
        .filter(|c| input.scope.path_matches(&c.file_path))
        .filter(|c| input.scope.tags_match(&c.tags))
        .filter(|c| input.scope.lang_matches(c.lang.as_str()))
        .collect();
    if survivors.is_empty() {
        return Err(SearchError::NoRelevantMatches);
    }

    let chunk_by_sha: HashMap<&str, &CodeChunk> = survivors.iter().map(|c| (c.sha.as_str(), *c)).collect();

    // Step 3-4: dense score plus optional symbol boost.
    struct Scored<'c> {
        chunk: &'c CodeChunk,
        vector_score: f32,
        boosted_dense: f32,
        symbol_boost: f32,
        final_score: f32,
    }

    let mut scored: Vec<Scored<'_>> = survivors
        .iter()
        .map(|&chunk| {
            let dense = dense_score(input.query_normalized, input.query_embedding, chunk);
            let boost = if input.scope.symbol_boost {
                symbol_boost(input.query_normalized, chunk, |sha| chunk_by_sha.get(sha).copied())
            } else {
                0.0
            };
            Scored {
                chunk,
                vector_score: dense.vector_score,
                boosted_dense: dense.boosted_score,
                symbol_boost: boost,
                final_score: dense.boosted_score + boost,
            }
        })
        .collect();

    // Step 5: sort by final score, take the selection budget.
    scored.sort_by(|a, b| b.final_score.partial_cmp(&a.final_score).unwrap_or(std::cmp::Ordering::Equal));
    let selection_budget = input.remaining_slots.max(MIN_SELECTION_BUDGET).min(scored.len());
    scored.truncate(selection_budget);

    let mut diagnostics = HybridSearchDiagnostics {
        symbol_boost_enabled: input.scope.symbol_boost,
        boosted: scored.iter().any(|s| s.symbol_boost > 0.0),
        reranker_requested: matches!(input.scope.reranker, pampa_core::Reranker::Transformers),
        ..Default::default()
    };

    let by_sha: HashMap<String, usize> =
        scored.iter().enumerate().map(|(i, s)| (s.chunk.sha.clone(), i)).collect();
    let vector_ranked: Vec<String> = scored.iter().map(|s| s.chunk.sha.clone()).collect();

    // Step 6: optional BM25 fusion.
    let mut hybrid_scores: HashMap<String, f32> = HashMap::new();
    let mut bm25_scores: HashMap<String, f32> = HashMap::new();
    let mut ordered_shas = vector_ranked.clone();

    if input.scope.hybrid && input.scope.bm25 {
        diagnostics.hybrid_enabled = true;
        diagnostics.bm25_enabled = true;

        let documents: Vec<Bm25Document> = survivors
            .iter()
            .map(|c| {
                let code = code_text(&c.sha).unwrap_or_default();
                let text = format!(
                    "{} {} {} {} {}",
                    c.symbol,
                    c.file_path,
                    c.description.as_deref().unwrap_or(""),
                    c.intent.as_deref().unwrap_or(""),
                    code
                );
                Bm25Document { id: c.sha.clone(), text }
            })
            .collect();
        let bm25_index = Bm25Index::build(&documents);
        let bm25_ranked_full = bm25_index.query(input.query_normalized, selection_budget);
        diagnostics.bm25_candidates = bm25_ranked_full.len();
        for (sha, score) in &bm25_ranked_full {
            bm25_scores.insert(sha.clone(), *score);
        }
        let bm25_ranked: Vec<String> = bm25_ranked_full.into_iter().map(|(id, _)| id).collect();

        if !bm25_ranked.is_empty() {
            diagnostics.fused = true;
            let fused = fuse(&vector_ranked, &bm25_ranked);
            for (sha, score) in &fused {
                hybrid_scores.insert(sha.clone(), *score);
            }
            ordered_shas = fused.into_iter().map(|(id, _)| id).collect();
        }
    }

    // Step 7: if any symbol boost fired, re-sort by (final desc, boost desc, hybrid desc).
    if diagnostics.boosted {
        ordered_shas.sort_by(|a, b| {
            let sa = &scored[by_sha[a]];
            let sb = &scored[by_sha[b]];
            sb.final_score
                .partial_cmp(&sa.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| sb.symbol_boost.partial_cmp(&sa.symbol_boost).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| {
                    let ha = hybrid_scores.get(a).copied().unwrap_or(0.0);
                    let hb = hybrid_scores.get(b).copied().unwrap_or(0.0);
                    hb.partial_cmp(&ha).unwrap_or(std::cmp::Ordering::Equal)
                })
        });
    }

    // Step 8: truncate to remaining slots.
    ordered_shas.truncate(input.remaining_slots);

    // Step 9: optional cross-encoder rerank, fail-soft.
    if let (Some(reranker), true) = (reranker, diagnostics.reranker_requested) {
        if ordered_shas.len() > 1 {
            let pairs: Vec<(String, String)> = ordered_shas
                .iter()
                .map(|sha| {
                    let chunk = chunk_by_sha[sha.as_str()];
                    let code = code_text(sha).unwrap_or_default();
                    (sha.clone(), build_reranker_document(chunk, &code))
                })
                .collect();
            let before = ordered_shas.clone();
            ordered_shas = rerank_top(reranker, input.query_normalized, pairs);
            diagnostics.reranker_applied = ordered_shas != before;
        }
    }

    // Step 10: emit results.
    let results = ordered_shas
        .into_iter()
        .map(|sha| {
            let s = &scored[by_sha[&sha]];
            let hybrid_score = hybrid_scores.get(&sha).copied();
            let bm25_score = bm25_scores.get(&sha).copied();
            let search_type = if hybrid_score.is_some() { SearchType::Hybrid } else { SearchType::Vector };
            SearchResult::new(
                s.chunk.chunk_id.clone(),
                s.chunk.sha.clone(),
                s.final_score,
                s.vector_score,
                hybrid_score,
                bm25_score,
                s.symbol_boost,
                search_type,
            )
        })
        .collect();

    Ok(HybridSearchOutput { results, diagnostics })
}
