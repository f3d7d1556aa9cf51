//! Query normalization, pattern masking, and the public
//! `recordIntention`/`searchByIntention`/`recordQueryPattern`/
//! `getQueryAnalytics` operations.

use std::path::Path;

use pampa_db::{IntentionMapping, PampaDb, QueryPattern};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::PampaError;
use crate::project_db;

/// Minimal, deliberately small substitution table (§4.8): this is part
/// of the stable interface, not a place for broader normalization.
const SUBSTITUTIONS: &[(&str, &str)] = &[("cmo", "como"), ("create", "crear"), ("session", "sesion")];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, trim, strip `?`, apply the fixed word substitution
/// table, and collapse whitespace.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let mut text = query.to_lowercase().replace('?', "");
    for (from, to) in SUBSTITUTIONS {
        let pattern = Regex::new(&format!(r"\b{from}\b")).expect("fixed substitution patterns are valid regex");
        text = pattern.replace_all(&text, *to).into_owned();
    }
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Mask the query-specific tokens a pattern-frequency table should
/// generalize over, so `"find the stripe checkout session"` and
/// `"find the paypal checkout session"` collapse to one pattern.
#[must_use]
pub fn mask_pattern(query_normalized: &str) -> String {
    const PAYMENT_PROVIDERS: &[&str] = &["stripe", "paypal", "braintree", "adyen"];
    const SERVICE_WORDS: &[&str] = &["service", "servicio"];
    const CONTROLLER_WORDS: &[&str] = &["controller", "controlador"];

    let mut masked = query_normalized.to_string();
    masked = replace_words(&masked, &["sesion", "session"], "[SESSION]");
    masked = replace_words(&masked, PAYMENT_PROVIDERS, "[PAYMENT_PROVIDER]");
    masked = replace_words(&masked, SERVICE_WORDS, "[SERVICE]");
    masked = replace_words(&masked, CONTROLLER_WORDS, "[CONTROLLER]");
    masked
}

fn replace_words(text: &str, words: &[&str], token: &str) -> String {
    let mut out = text.to_string();
    for word in words {
        let pattern = Regex::new(&format!(r"\b{word}\b")).expect("fixed mask word patterns are valid regex");
        out = pattern.replace_all(&out, token).into_owned();
    }
    out
}

/// Record (or reinforce) a direct query-to-chunk mapping.
pub async fn record_intention(repo_path: &Path, query: &str, target_sha: &str, confidence: f64) -> Result<(), PampaError> {
    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(());
    };
    let normalized = normalize_query(query);
    db.record_intention(&normalized, query, target_sha, confidence).await?;
    Ok(())
}

/// Direct-hit intention cache lookup, independent of a full search.
pub async fn search_by_intention(repo_path: &Path, query: &str) -> Result<Option<IntentionMapping>, PampaError> {
    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(None);
    };
    let normalized = normalize_query(query);
    Ok(db.find_intention(&normalized).await?)
}

/// Record a masked query pattern's frequency. Tolerates a missing
/// database (graceful skip, §4.8) since pattern recording is advisory.
pub async fn record_query_pattern(repo_path: &Path, query: &str) -> Result<(), PampaError> {
    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(());
    };
    record_query_pattern_on(&db, query).await
}

pub(crate) async fn record_query_pattern_on(db: &PampaDb, query: &str) -> Result<(), PampaError> {
    let pattern = mask_pattern(&normalize_query(query));
    db.record_query_pattern(&pattern).await?;
    Ok(())
}

/// The most frequent recorded query patterns, most frequent first.
pub async fn get_query_analytics(repo_path: &Path, limit: u32) -> Result<Vec<QueryPattern>, PampaError> {
    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(Vec::new());
    };
    Ok(db.top_query_patterns(limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_punctuation_and_whitespace() {
        assert_eq!(normalize_query("  How do I Create a Session?  "), "how do i crear a sesion");
    }

    #[test]
    fn substitution_table_is_word_bounded() {
        // "sessions" must not become "sesions" -- only the whole word "session" is replaced.
        assert_eq!(normalize_query("sessions"), "sessions");
    }

    #[test]
    fn substitution_applies_cmo_to_como() {
        assert_eq!(normalize_query("cmo hago esto"), "como hago esto");
    }

    #[test]
    fn masks_payment_provider_and_session_tokens() {
        let normalized = normalize_query("find the stripe checkout session");
        assert_eq!(mask_pattern(&normalized), "find the [PAYMENT_PROVIDER] checkout [SESSION]");
    }

    #[test]
    fn masks_service_and_controller_tokens() {
        assert_eq!(mask_pattern("the billing service uses a payment controller"), "the billing [SERVICE] uses a payment [CONTROLLER]");
    }

    #[tokio::test]
    async fn missing_database_is_a_graceful_skip_for_pattern_recording() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(record_query_pattern(tmp.path(), "anything").await.is_ok());
    }

    #[tokio::test]
    async fn missing_database_is_none_for_intention_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(search_by_intention(tmp.path(), "anything").await.unwrap().is_none());
    }
}
