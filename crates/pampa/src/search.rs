//! `searchCode`: intention-cache lookup, then hybrid retrieval, composed
//! into one structured, non-throwing outcome plus the §4.8 feedback loop.

use std::path::Path;

use pampa_contextpack::resolve_scope;
use pampa_core::{Scope, ScopeOverrides};
use pampa_search::hybrid::{HybridSearchInput, HybridSearchOutput};
use pampa_search::reranker::UnavailableReranker;
use pampa_search::{SearchError, SearchResult, SearchType};
use pampa_store::{ChunkStore, MasterKey};

use crate::error::PampaError;
use crate::intention::{normalize_query, record_query_pattern_on};
use crate::project_db;

/// Confidence a search's top result must clear to teach the intention
/// cache, per §4.8's feedback rule.
const FEEDBACK_THRESHOLD: f32 = 0.8;

pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub limit: usize,
    pub provider: &'a str,
    pub repo_path: &'a Path,
    pub overrides: ScopeOverrides,
    pub session_pack: Option<&'a str>,
}

/// The structured, non-throwing failure states §7 keeps out of
/// [`PampaError`] entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    DatabaseNotFound,
    NoChunksFound,
    NoRelevantMatches,
    SearchError,
}

#[derive(Debug, Clone)]
pub struct SearchFailure {
    pub error: SearchErrorKind,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HybridDiagnostics {
    pub enabled: bool,
    pub bm25_enabled: bool,
    pub fused: bool,
    pub bm25_candidates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolBoostDiagnostics {
    pub enabled: bool,
    pub boosted: bool,
}

pub struct SearchSuccess {
    pub query: String,
    pub search_type: SearchType,
    pub intention_results: Vec<SearchResult>,
    pub vector_results: Vec<SearchResult>,
    pub provider: String,
    pub scope: Scope,
    pub hybrid: HybridDiagnostics,
    pub reranker: bool,
    pub symbol_boost: SymbolBoostDiagnostics,
    pub results: Vec<SearchResult>,
}

pub enum SearchOutcome {
    Success(Box<SearchSuccess>),
    Failure(SearchFailure),
}

fn failure(error: SearchErrorKind, message: impl Into<String>, suggestion: Option<&str>) -> SearchOutcome {
    SearchOutcome::Failure(SearchFailure { error, message: message.into(), suggestion: suggestion.map(str::to_string) })
}

/// Run `searchCode`: intention-cache direct hit first, then hybrid
/// retrieval for the remaining slots, composed into one result list.
pub async fn search_code(request: &SearchRequest<'_>) -> Result<SearchOutcome, PampaError> {
    crate::tracing_init::init_tracing();

    let Some(db) = project_db::open_existing(request.repo_path).await? else {
        return Ok(failure(
            SearchErrorKind::DatabaseNotFound,
            format!("{} is not a PAMPA project", request.repo_path.display()),
            Some("run indexProject first"),
        ));
    };

    let scope = resolve_scope(request.repo_path, &request.overrides, request.session_pack)?;
    let normalized = normalize_query(request.query);

    if let Err(e) = record_query_pattern_on(&db, request.query).await {
        tracing::warn!(error = %e, "query pattern recording failed; continuing search");
    }

    let provider = pampa_embeddings::create_provider(request.provider)?;
    let dimensions = provider.dimensions();

    let intention_hit = db.find_intention(&normalized).await?;
    let mut intention_results = Vec::new();
    let mut exclude_shas = Vec::new();
    if let Some(mapping) = &intention_hit {
        if let Some(chunk) = db.find_chunk_by_sha(&mapping.target_sha).await? {
            intention_results.push(SearchResult::new(
                chunk.chunk_id.clone(),
                chunk.sha.clone(),
                mapping.confidence as f32,
                mapping.confidence as f32,
                None,
                None,
                0.0,
                SearchType::Intention,
            ));
            exclude_shas.push(mapping.target_sha.clone());
        }
    }

    let chunks = db.list_chunks_for_provider(provider.name(), dimensions).await?;
    if chunks.is_empty() {
        return Ok(intention_only_or_failure(
            intention_results,
            request,
            &scope,
            provider.name(),
            SearchErrorKind::NoChunksFound,
            format!("no chunks indexed for provider {:?}", provider.name()),
            Some("run indexProject for this provider first"),
        ));
    }

    let remaining_slots = request.limit.saturating_sub(intention_results.len());
    if remaining_slots == 0 {
        return Ok(success_outcome(request, &scope, provider.name(), intention_results, Vec::new(), HybridDiagnostics::default(), false, SymbolBoostDiagnostics { enabled: scope.symbol_boost, boosted: false }));
    }

    let embedding = match provider.embed(&[normalized.clone()]).await {
        Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
        Ok(_) | Err(_) => {
            return Ok(intention_only_or_failure(
                intention_results,
                request,
                &scope,
                provider.name(),
                SearchErrorKind::SearchError,
                "failed to embed the query".to_string(),
                None,
            ));
        }
    };

    let store = ChunkStore::open(request.repo_path)?;
    let master_key = MasterKey::from_env().ok();
    let code_text = |sha: &str| store.read(sha, master_key.as_ref()).ok();

    let reranker_enabled = matches!(scope.reranker, pampa_core::Reranker::Transformers);
    let reranker: Option<&dyn pampa_search::CrossEncoderReranker> = if reranker_enabled { Some(&UnavailableReranker) } else { None };

    let input = HybridSearchInput {
        query_normalized: &normalized,
        query_embedding: &embedding,
        scope: &scope,
        provider: provider.name(),
        dimensions,
        remaining_slots,
        exclude_shas: &exclude_shas,
    };

    match pampa_search::hybrid::search(&chunks, code_text, reranker, &input) {
        Ok(HybridSearchOutput { results, diagnostics }) => {
            let outcome = success_outcome(
                request,
                &scope,
                provider.name(),
                intention_results,
                results,
                HybridDiagnostics {
                    enabled: diagnostics.hybrid_enabled,
                    bm25_enabled: diagnostics.bm25_enabled,
                    fused: diagnostics.fused,
                    bm25_candidates: diagnostics.bm25_candidates,
                },
                diagnostics.reranker_applied,
                SymbolBoostDiagnostics { enabled: diagnostics.symbol_boost_enabled, boosted: diagnostics.boosted },
            );
            if let SearchOutcome::Success(success) = &outcome {
                apply_feedback(&db, request.query, &normalized, success).await?;
            }
            Ok(outcome)
        }
        Err(SearchError::NoChunksFound { .. }) => Ok(intention_only_or_failure(
            intention_results,
            request,
            &scope,
            provider.name(),
            SearchErrorKind::NoChunksFound,
            "no chunks indexed for this provider".to_string(),
            Some("run indexProject for this provider first"),
        )),
        Err(SearchError::NoRelevantMatches) => Ok(intention_only_or_failure(
            intention_results,
            request,
            &scope,
            provider.name(),
            SearchErrorKind::NoRelevantMatches,
            "no chunks matched the given scope and query".to_string(),
            Some("widen the scope or try a different query"),
        )),
        Err(SearchError::DimensionMismatch { .. }) => Ok(intention_only_or_failure(
            intention_results,
            request,
            &scope,
            provider.name(),
            SearchErrorKind::SearchError,
            "query embedding dimension mismatch".to_string(),
            None,
        )),
    }
}

/// An intention-cache hit is a legitimate result on its own: a failure
/// from the hybrid stage downgrades to a success carrying just that hit
/// rather than discarding it.
fn intention_only_or_failure(
    intention_results: Vec<SearchResult>,
    request: &SearchRequest<'_>,
    scope: &Scope,
    provider_name: &str,
    error: SearchErrorKind,
    message: String,
    suggestion: Option<&str>,
) -> SearchOutcome {
    if intention_results.is_empty() {
        failure(error, message, suggestion)
    } else {
        success_outcome(
            request,
            scope,
            provider_name,
            intention_results,
            Vec::new(),
            HybridDiagnostics::default(),
            false,
            SymbolBoostDiagnostics { enabled: scope.symbol_boost, boosted: false },
        )
    }
}

fn success_outcome(
    request: &SearchRequest<'_>,
    scope: &Scope,
    provider_name: &str,
    intention_results: Vec<SearchResult>,
    vector_results: Vec<SearchResult>,
    hybrid: HybridDiagnostics,
    reranker_applied: bool,
    symbol_boost: SymbolBoostDiagnostics,
) -> SearchOutcome {
    let search_type = if !intention_results.is_empty() {
        SearchType::Intention
    } else if hybrid.fused {
        SearchType::Hybrid
    } else {
        SearchType::Vector
    };

    let mut results = intention_results.clone();
    results.extend(vector_results.iter().cloned());
    results.truncate(request.limit.max(1));

    SearchOutcome::Success(Box::new(SearchSuccess {
        query: request.query.to_string(),
        search_type,
        intention_results,
        vector_results,
        provider: provider_name.to_string(),
        scope: scope.clone(),
        hybrid,
        reranker: reranker_applied,
        symbol_boost,
        results,
    }))
}

/// §4.8: a confident top result teaches the intention cache, so the
/// next identical (or substitution-normalized) query is a direct hit.
async fn apply_feedback(db: &pampa_db::PampaDb, original_query: &str, normalized: &str, success: &SearchSuccess) -> Result<(), PampaError> {
    let Some(top) = success.results.first() else {
        return Ok(());
    };
    if top.score > FEEDBACK_THRESHOLD {
        db.record_intention(normalized, original_query, &top.sha, f64::from(top.score)).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::{ChunkType, CodeChunk, Language};

    async fn open_project_db(repo_path: &Path) -> pampa_db::PampaDb {
        let db_path = project_db::db_path(repo_path);
        std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        pampa_db::PampaDb::open_local(&db_path.to_string_lossy()).await.unwrap()
    }

    fn sample_chunk(sha: &str, symbol: &str) -> CodeChunk {
        let now = chrono::Utc::now();
        CodeChunk {
            chunk_id: format!("src/a.php:{symbol}:{sha}"),
            file_path: "src/a.php".to_string(),
            symbol: symbol.to_string(),
            sha: sha.to_string(),
            lang: Language::Php,
            chunk_type: ChunkType::Function,
            embedding_provider: "openai".to_string(),
            embedding_dimensions: 3072,
            embedding: vec![0.9, 0.1],
            tags: Vec::new(),
            intent: None,
            description: Some("creates a checkout session".to_string()),
            doc_comments: None,
            variables: Vec::new(),
            context_info: None,
            signature: Some(format!("{symbol}()")),
            parameters: Vec::new(),
            return_type: None,
            calls: Vec::new(),
            call_targets: Vec::new(),
            callers: Vec::new(),
            symbol_neighbors: Vec::new(),
            encrypted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_database_reports_database_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let request = SearchRequest {
            query: "create a session",
            limit: 10,
            provider: "openai",
            repo_path: tmp.path(),
            overrides: ScopeOverrides::default(),
            session_pack: None,
        };
        let outcome = search_code(&request).await.unwrap();
        match outcome {
            SearchOutcome::Failure(f) => assert_eq!(f.error, SearchErrorKind::DatabaseNotFound),
            SearchOutcome::Success(_) => panic!("expected a failure outcome"),
        }
    }

    #[tokio::test]
    async fn no_chunks_for_provider_reports_no_chunks_found() {
        let tmp = tempfile::tempdir().unwrap();
        let _db = open_project_db(tmp.path()).await;

        let request = SearchRequest {
            query: "create a session",
            limit: 10,
            provider: "openai",
            repo_path: tmp.path(),
            overrides: ScopeOverrides::default(),
            session_pack: None,
        };
        let outcome = search_code(&request).await.unwrap();
        match outcome {
            SearchOutcome::Failure(f) => assert_eq!(f.error, SearchErrorKind::NoChunksFound),
            SearchOutcome::Success(_) => panic!("expected a failure outcome"),
        }
    }

    #[tokio::test]
    async fn intention_hit_survives_when_embedding_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let db = open_project_db(tmp.path()).await;
        let chunk = sample_chunk("deadbeef01", "createCheckoutSession");
        db.upsert_chunk(&chunk).await.unwrap();
        db.record_intention("create a session", "create a session", &chunk.sha, 0.9).await.unwrap();

        // provider "openai" is the uniform-contract stub: it always
        // fails embed(), which is exactly the path this test exercises
        // without ever downloading a real model.
        let request = SearchRequest {
            query: "create a session",
            limit: 10,
            provider: "openai",
            repo_path: tmp.path(),
            overrides: ScopeOverrides::default(),
            session_pack: None,
        };
        let outcome = search_code(&request).await.unwrap();
        match outcome {
            SearchOutcome::Success(success) => {
                assert_eq!(success.search_type, SearchType::Intention);
                assert_eq!(success.results.len(), 1);
                assert_eq!(success.results[0].sha, chunk.sha);
            }
            SearchOutcome::Failure(f) => panic!("expected the intention hit to survive, got {f:?}"),
        }
    }

    #[tokio::test]
    async fn normalization_is_applied_before_intention_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let db = open_project_db(tmp.path()).await;
        let chunk = sample_chunk("deadbeef02", "createCheckoutSession");
        db.upsert_chunk(&chunk).await.unwrap();
        db.record_intention("como crear sesion", "Cmo crear sesion?", &chunk.sha, 0.95).await.unwrap();

        let request = SearchRequest {
            query: "  Cmo Crear Sesion?  ",
            limit: 10,
            provider: "openai",
            repo_path: tmp.path(),
            overrides: ScopeOverrides::default(),
            session_pack: None,
        };
        let outcome = search_code(&request).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::Success(_)));
    }
}
