//! Sparse keyword scoring over chunk documents.
//!
//! Classic Okapi BM25 with `k1 = 1.2`, `b = 0.75`. The document text for a
//! chunk is the concatenation of its symbol, file path, pampa description,
//! pampa intent, and code text (loaded from the chunk store by the caller).

use std::collections::HashMap;

const K1: f32 = 1.2;
const B: f32 = 0.75;

/// Lowercase, replace non-letter/non-digit (Unicode-aware) with spaces,
/// split on whitespace, drop empties.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// One document in the BM25 corpus, identified by chunk id.
pub struct Bm25Document {
    pub id: String,
    pub text: String,
}

/// An in-memory BM25 index over a fixed document set.
///
/// Built lazily and owned by the caller's `(repo_root, provider, dimensions)`
/// cache; any mutation to the underlying chunk set should discard this and
/// rebuild.
pub struct Bm25Index {
    doc_ids: Vec<String>,
    doc_term_freqs: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<f32>,
    doc_freq: HashMap<String, u32>,
    avg_doc_len: f32,
    total_docs: usize,
}

impl Bm25Index {
    /// Build an index from the given documents.
    #[must_use]
    pub fn build(documents: &[Bm25Document]) -> Self {
        let mut doc_ids = Vec::with_capacity(documents.len());
        let mut doc_term_freqs = Vec::with_capacity(documents.len());
        let mut doc_lengths = Vec::with_capacity(documents.len());
        let mut doc_freq: HashMap<String, u32> = HashMap::new();
        let mut total_length = 0.0f32;

        for doc in documents {
            let tokens = tokenize(&doc.text);
            let mut term_freq: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
            }
            for term in term_freq.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            doc_ids.push(doc.id.clone());
            doc_lengths.push(tokens.len() as f32);
            total_length += tokens.len() as f32;
            doc_term_freqs.push(term_freq);
        }

        let total_docs = documents.len();
        let avg_doc_len = if total_docs > 0 {
            total_length / total_docs as f32
        } else {
            0.0
        };

        Self { doc_ids, doc_term_freqs, doc_lengths, doc_freq, avg_doc_len, total_docs }
    }

    fn idf(&self, term: &str) -> f32 {
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f32;
        let n = self.total_docs as f32;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Score every document against `query`, return the top `limit` by
    /// descending BM25 score (ties broken by original document order).
    #[must_use]
    pub fn query(&self, query: &str, limit: usize) -> Vec<(String, f32)> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || self.total_docs == 0 {
            return Vec::new();
        }

        let mut scores: Vec<(usize, f32)> = (0..self.total_docs)
            .map(|i| {
                let mut score = 0.0f32;
                let doc_len = self.doc_lengths[i];
                for term in &query_terms {
                    let Some(&tf) = self.doc_term_freqs[i].get(term) else { continue };
                    let tf = tf as f32;
                    let idf = self.idf(term);
                    let denom = tf + K1 * (1.0 - B + B * doc_len / self.avg_doc_len.max(1.0));
                    score += idf * (tf * (K1 + 1.0)) / denom;
                }
                (i, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(limit);
        scores.into_iter().map(|(i, score)| (self.doc_ids[i].clone(), score)).collect()
    }
}
