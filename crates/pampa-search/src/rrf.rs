//! Reciprocal Rank Fusion: combine independently ranked candidate lists
//! into one fused ranking without needing comparable scores.

const K: f32 = 60.0;

/// Fuse a vector-ranked and a BM25-ranked candidate list (both already
/// sorted best-first) via `rrf(id) = sum_source 1/(k + rank_source(id) + 1)`.
///
/// Returns ids sorted by descending fused score, ties broken by the
/// better (lower) vector rank, then the better BM25 rank.
#[must_use]
pub fn fuse(vector_ranked: &[String], bm25_ranked: &[String]) -> Vec<(String, f32)> {
    use std::collections::HashMap;

    let vector_rank: HashMap<&str, usize> =
        vector_ranked.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
    let bm25_rank: HashMap<&str, usize> =
        bm25_ranked.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    let mut all_ids: Vec<&str> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for id in vector_ranked.iter().chain(bm25_ranked.iter()) {
        if seen.insert(id.as_str()) {
            all_ids.push(id.as_str());
        }
    }

    let mut fused: Vec<(String, f32, usize, usize)> = all_ids
        .into_iter()
        .map(|id| {
            let vr = vector_rank.get(id).copied();
            let br = bm25_rank.get(id).copied();
            let mut score = 0.0;
            if let Some(r) = vr {
                score += 1.0 / (K + r as f32 + 1.0);
            }
            if let Some(r) = br {
                score += 1.0 / (K + r as f32 + 1.0);
            }
            (id.to_string(), score, vr.unwrap_or(usize::MAX), br.unwrap_or(usize::MAX))
        })
        .collect();

    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
            .then(a.3.cmp(&b.3))
    });

    fused.into_iter().map(|(id, score, _, _)| (id, score)).collect()
}
