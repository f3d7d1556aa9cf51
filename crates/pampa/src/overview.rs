//! `getOverview`/`getChunk`: read-only project inspection operations.

use std::path::Path;

use pampa_core::CodeChunk;
use pampa_store::{ChunkStore, MasterKey};

use crate::error::PampaError;
use crate::project_db;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewErrorKind {
    DatabaseNotFound,
}

pub enum OverviewOutcome {
    Success { total_chunks: u64, recent: Vec<CodeChunk> },
    Failure { error: OverviewErrorKind, message: String },
}

/// Recently touched chunks across the whole project, newest first.
pub async fn get_overview(repo_path: &Path, limit: u32) -> Result<OverviewOutcome, PampaError> {
    crate::tracing_init::init_tracing();

    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(OverviewOutcome::Failure {
            error: OverviewErrorKind::DatabaseNotFound,
            message: format!("{} is not a PAMPA project", repo_path.display()),
        });
    };

    let total_chunks = db.count_chunks().await?;
    let recent = db.recent_chunks(limit).await?;
    Ok(OverviewOutcome::Success { total_chunks, recent })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkErrorKind {
    DatabaseNotFound,
    ChunkNotFound,
}

pub enum ChunkOutcome {
    Success { code: String },
    Failure { error: ChunkErrorKind, message: String },
}

/// Read a single chunk's stored code text back by its content sha.
pub async fn get_chunk(repo_path: &Path, sha: &str) -> Result<ChunkOutcome, PampaError> {
    crate::tracing_init::init_tracing();

    let Some(db) = project_db::open_existing(repo_path).await? else {
        return Ok(ChunkOutcome::Failure {
            error: ChunkErrorKind::DatabaseNotFound,
            message: format!("{} is not a PAMPA project", repo_path.display()),
        });
    };

    let Some(chunk) = db.find_chunk_by_sha(sha).await? else {
        return Ok(ChunkOutcome::Failure { error: ChunkErrorKind::ChunkNotFound, message: format!("no chunk with sha {sha}") });
    };

    let store = ChunkStore::open(repo_path)?;
    let master_key = if chunk.encrypted { Some(MasterKey::from_env()?) } else { None };
    let code = store.read(&chunk.sha, master_key.as_ref())?;
    Ok(ChunkOutcome::Success { code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::{ChunkType, Language};

    fn sample_chunk(sha: &str) -> CodeChunk {
        let now = chrono::Utc::now();
        CodeChunk {
            chunk_id: format!("src/a.php:foo:{sha}"),
            file_path: "src/a.php".to_string(),
            symbol: "foo".to_string(),
            sha: sha.to_string(),
            lang: Language::Php,
            chunk_type: ChunkType::Function,
            embedding_provider: "local".to_string(),
            embedding_dimensions: 3,
            embedding: vec![0.1, 0.2, 0.3],
            tags: Vec::new(),
            intent: None,
            description: None,
            doc_comments: None,
            variables: Vec::new(),
            context_info: None,
            signature: Some("foo()".to_string()),
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
    async fn overview_reports_database_not_found_before_first_index() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = get_overview(tmp.path(), 10).await.unwrap();
        assert!(matches!(outcome, OverviewOutcome::Failure { error: OverviewErrorKind::DatabaseNotFound, .. }));
    }

    #[tokio::test]
    async fn overview_returns_recent_chunks_and_total_count() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = project_db::db_path(tmp.path());
        std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        let db = pampa_db::PampaDb::open_local(&db_path.to_string_lossy()).await.unwrap();
        db.upsert_chunk(&sample_chunk("abcd1234")).await.unwrap();

        let outcome = get_overview(tmp.path(), 10).await.unwrap();
        match outcome {
            OverviewOutcome::Success { total_chunks, recent } => {
                assert_eq!(total_chunks, 1);
                assert_eq!(recent.len(), 1);
            }
            OverviewOutcome::Failure { .. } => panic!("expected a success outcome"),
        }
    }

    #[tokio::test]
    async fn get_chunk_reads_back_plaintext_code() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = project_db::db_path(tmp.path());
        std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        let db = pampa_db::PampaDb::open_local(&db_path.to_string_lossy()).await.unwrap();
        let chunk = sample_chunk("abcd1234");
        db.upsert_chunk(&chunk).await.unwrap();

        let store = ChunkStore::open(tmp.path()).unwrap();
        store.write_plain(&chunk.sha, "function foo() { return true; }").unwrap();

        let outcome = get_chunk(tmp.path(), &chunk.sha).await.unwrap();
        match outcome {
            ChunkOutcome::Success { code } => assert_eq!(code, "function foo() { return true; }"),
            ChunkOutcome::Failure { error, message } => panic!("expected success, got {error:?}: {message}"),
        }
    }

    #[tokio::test]
    async fn get_chunk_reports_chunk_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = project_db::db_path(tmp.path());
        std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        let _db = pampa_db::PampaDb::open_local(&db_path.to_string_lossy()).await.unwrap();

        let outcome = get_chunk(tmp.path(), "nonexistent").await.unwrap();
        assert!(matches!(outcome, ChunkOutcome::Failure { error: ChunkErrorKind::ChunkNotFound, .. }));
    }
}
