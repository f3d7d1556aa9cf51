//! Cross-encoder reranking: a `(query, candidate_text)` scorer applied to
//! the head of the fused list. Fails soft — any error leaves the
//! pre-rerank order untouched.

/// A cross-encoder capable of jointly scoring a query against a batch of
/// candidate documents.
pub trait CrossEncoderReranker: Send + Sync {
    /// Score each of `documents` against `query`. Higher is more relevant.
    /// On success the returned vector MUST have the same length as
    /// `documents` — callers discard mismatched-length results.
    fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, String>;
}

/// Placeholder cross-encoder: the `transformers` reranker model is not
/// bundled, so this always reports failure, which callers treat as a
/// no-op (pre-rerank order preserved) per the fail-soft contract.
pub struct UnavailableReranker;

impl CrossEncoderReranker for UnavailableReranker {
    fn rerank(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>, String> {
        Err("cross-encoder reranker model not available".to_string())
    }
}

/// Apply `reranker` to the top `min(50, candidates.len())` of
/// `candidates` (already sorted best-first), replacing their order with
/// the reranker's own ranking when it returns exactly that many scores.
/// Falls back silently to the original order on any failure.
#[must_use]
pub fn rerank_top<R: CrossEncoderReranker + ?Sized>(
    reranker: &R,
    query: &str,
    candidates: Vec<(String, String)>,
) -> Vec<String> {
    if candidates.len() <= 1 {
        return candidates.into_iter().map(|(id, _)| id).collect();
    }

    let head_len = candidates.len().min(50);
    let (head, tail) = candidates.split_at(head_len);
    let documents: Vec<String> = head.iter().map(|(_, doc)| doc.clone()).collect();

    match reranker.rerank(query, &documents) {
        Ok(scores) if scores.len() == head.len() => {
            let mut scored: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            scored
                .into_iter()
                .map(|(i, _)| head[i].0.clone())
                .chain(tail.iter().map(|(id, _)| id.clone()))
                .collect()
        }
        _ => candidates.into_iter().map(|(id, _)| id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReverseReranker;
    impl CrossEncoderReranker for ReverseReranker {
        fn rerank(&self, _query: &str, documents: &[String]) -> Result<Vec<f32>, String> {
            Ok((0..documents.len()).rev().map(|i| i as f32).collect())
        }
    }

    struct WrongLengthReranker;
    impl CrossEncoderReranker for WrongLengthReranker {
        fn rerank(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>, String> {
            Ok(vec![1.0])
        }
    }

    fn candidates() -> Vec<(String, String)> {
        vec![
            ("a".to_string(), "doc a".to_string()),
            ("b".to_string(), "doc b".to_string()),
            ("c".to_string(), "doc c".to_string()),
        ]
    }

    #[test]
    fn failing_reranker_preserves_order() {
        let result = rerank_top(&UnavailableReranker, "q", candidates());
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn wrong_length_result_preserves_order() {
        let result = rerank_top(&WrongLengthReranker, "q", candidates());
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn successful_reranker_reorders_head_only() {
        let result = rerank_top(&ReverseReranker, "q", candidates());
        assert_eq!(result, vec!["c", "b", "a"]);
    }

    #[test]
    fn single_candidate_is_not_reranked() {
        let result = rerank_top(&UnavailableReranker, "q", vec![("a".to_string(), "doc a".to_string())]);
        assert_eq!(result, vec!["a"]);
    }
}
