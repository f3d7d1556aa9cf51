//! Dense vector scoring: cosine similarity plus intent/tag agreement.

use pampa_core::CodeChunk;

/// Cosine similarity between two equal-length vectors. Returns 0.0 if
/// either vector has zero magnitude.
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Per-chunk dense score: raw cosine plus agreement bonuses, capped at
/// 1.0. The uncapped cosine is returned alongside as `vector_score`.
#[must_use]
pub fn dense_score(query_normalized: &str, query_embedding: &[f32], chunk: &CodeChunk) -> DenseScore {
    let vector_score = cosine(query_embedding, &chunk.embedding);

    let mut boosted = vector_score;
    if let Some(ref intent) = chunk.intent {
        if !intent.is_empty() && query_normalized.contains(&intent.to_lowercase()) {
            boosted += 0.2;
        }
    }
    let tag_hits = chunk
        .tags
        .iter()
        .filter(|tag| !tag.is_empty() && query_normalized.contains(&tag.to_lowercase()))
        .count();
    boosted += 0.1 * tag_hits as f32;

    DenseScore { vector_score, boosted_score: boosted.min(1.0) }
}

/// Result of [`dense_score`]: raw cosine kept separately from the
/// capped, intent/tag-boosted score used for ranking.
#[derive(Debug, Clone, Copy)]
pub struct DenseScore {
    pub vector_score: f32,
    pub boosted_score: f32,
}
