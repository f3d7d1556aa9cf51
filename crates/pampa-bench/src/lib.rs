//! # pampa-bench
//!
//! IR quality metrics for evaluating a ranked list of result ids
//! against a relevance judgment: precision@K, MRR@K, nDCG@K. Used by
//! this crate's own `tests/ir_quality.rs` regression suite to guard
//! against retrieval-quality regressions in `pampa-search`, the way a
//! benchmark harness is meant to be used — as a test, not a binary.

use std::collections::HashMap;

/// Fraction of the top `k` results that are relevant. `k` is clamped
/// to `ranked.len()` when the ranking is shorter than `k`.
pub fn precision_at_k(ranked: &[String], relevant: &[String], k: usize) -> f64 {
    if k == 0 || ranked.is_empty() {
        return 0.0;
    }
    let top_k = &ranked[..k.min(ranked.len())];
    let hits = top_k.iter().filter(|id| relevant.iter().any(|r| r == *id)).count();
    hits as f64 / top_k.len() as f64
}

/// Reciprocal rank of the first relevant result within the top `k`,
/// `0.0` if none of the top `k` are relevant.
pub fn mrr_at_k(ranked: &[String], relevant: &[String], k: usize) -> f64 {
    let top_k = &ranked[..k.min(ranked.len())];
    for (i, id) in top_k.iter().enumerate() {
        if relevant.iter().any(|r| r == id) {
            return 1.0 / (i + 1) as f64;
        }
    }
    0.0
}

/// Normalized discounted cumulative gain over the top `k`, using
/// binary relevance (graded relevance is `relevance_of` returning
/// something other than 0.0/1.0, supported by [`ndcg_at_k_graded`]).
pub fn ndcg_at_k(ranked: &[String], relevant: &[String], k: usize) -> f64 {
    let graded: HashMap<String, f64> = relevant.iter().map(|id| (id.clone(), 1.0)).collect();
    ndcg_at_k_graded(ranked, &graded, k)
}

/// `nDCG@k` with graded relevance judgments (ids absent from
/// `relevance` are treated as relevance `0.0`). `0.0` when the ideal
/// ranking's DCG is `0.0` (no relevant ids exist at all).
pub fn ndcg_at_k_graded(ranked: &[String], relevance: &HashMap<String, f64>, k: usize) -> f64 {
    let top_k = &ranked[..k.min(ranked.len())];
    let dcg: f64 = top_k
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let rel = relevance.get(id).copied().unwrap_or(0.0);
            rel / (i as f64 + 2.0).log2()
        })
        .sum();

    let mut ideal: Vec<f64> = relevance.values().copied().collect();
    ideal.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let idcg: f64 = ideal.iter().take(k).enumerate().map(|(i, rel)| rel / (i as f64 + 2.0).log2()).sum();

    if idcg == 0.0 { 0.0 } else { dcg / idcg }
}
