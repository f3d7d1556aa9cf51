//! Symbol/signature-aware boost: rewards chunks whose name, signature, or
//! call neighbors textually echo the query, on top of the dense score.

use pampa_core::CodeChunk;
use regex::Regex;

/// Split an identifier on `camelCase`, `_`, and `-` boundaries into
/// lowercase word tokens.
fn split_identifier_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in identifier.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.into_iter().filter(|w| !w.is_empty()).collect()
}

fn token_in_query(query_normalized: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let escaped = regex::escape(token);
    let Ok(re) = Regex::new(&format!(r"\b{escaped}\w*\b")) else { return false };
    re.is_match(query_normalized)
}

/// Signature-match strength in `[0, 1]` for one chunk against a query.
#[must_use]
pub fn signature_match_strength(query_normalized: &str, symbol: &str, signature: Option<&str>, parameters: &[String]) -> f32 {
    let symbol_in_query = f32::from(!symbol.is_empty() && query_normalized.contains(&symbol.to_lowercase()));

    let signature_normalized = signature.map(|s| s.to_lowercase());
    let signature_in_query = f32::from(
        signature_normalized.as_deref().is_some_and(|s| !s.is_empty() && query_normalized.contains(s)),
    );

    let symbol_tokens = split_identifier_words(symbol);
    let symbol_hits = symbol_tokens.iter().filter(|t| token_in_query(query_normalized, t)).count();
    let symbol_term = if symbol_hits > 0 { 1.0 + 0.5 * (symbol_hits as f32 - 1.0) } else { 0.0 };

    let parameter_hits = parameters
        .iter()
        .flat_map(|p| split_identifier_words(p))
        .filter(|t| token_in_query(query_normalized, t))
        .count();

    let weight = 4.0 * symbol_in_query + 3.5 * signature_in_query + symbol_term + 0.35 * parameter_hits as f32;
    (weight / 4.0).min(1.0)
}

/// Full symbol boost for `chunk`: signature strength of the chunk itself
/// plus the strongest signature match among its call-graph neighbors,
/// capped at 0.45. `lookup` resolves a neighbor sha to its chunk.
pub fn symbol_boost<'a, L>(query_normalized: &str, chunk: &CodeChunk, lookup: L) -> f32
where
    L: Fn(&str) -> Option<&'a CodeChunk>,
{
    let own_strength = signature_match_strength(query_normalized, &chunk.symbol, chunk.signature.as_deref(), &chunk.parameters);
    let signature_boost = own_strength * 0.3;

    let neighbor_strength = chunk
        .symbol_neighbors
        .iter()
        .filter_map(|sha| lookup(sha))
        .map(|neighbor| signature_match_strength(query_normalized, &neighbor.symbol, neighbor.signature.as_deref(), &neighbor.parameters))
        .fold(0.0f32, f32::max);
    let neighbor_boost = neighbor_strength * 0.15;

    (signature_boost + neighbor_boost).min(0.45)
}
