//! `indexProject`: resolve a provider by name, open (creating if
//! absent) the project database, and run one indexing pass.

use std::path::Path;

use pampa_db::PampaDb;
pub use pampa_index::{EncryptPreference, IndexOutcome, IndexProgress};

use crate::error::PampaError;
use crate::project_db;

pub struct IndexProjectRequest<'a> {
    pub repo_path: &'a Path,
    pub provider: &'a str,
    /// `None` triggers a full tree walk; `Some` (even empty) is a
    /// partial run scoped to these paths plus `deleted_files`.
    pub changed_files: Option<&'a [String]>,
    pub deleted_files: Option<&'a [String]>,
    pub encrypt: EncryptPreference,
}

/// Run `indexProject`, creating the project's `.pampa/pampa.db` on
/// first use.
pub async fn index_project(
    request: &IndexProjectRequest<'_>,
    on_progress: Option<&(dyn Fn(&IndexProgress<'_>) + Sync)>,
) -> Result<IndexOutcome, PampaError> {
    crate::tracing_init::init_tracing();

    let db_path = project_db::db_path(request.repo_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| pampa_store::StoreError::Io { path: parent.display().to_string(), source: e })?;
    }
    let db = PampaDb::open_local(&db_path.to_string_lossy()).await?;

    let provider = pampa_embeddings::create_provider(request.provider)?;
    let inner_request = pampa_index::IndexRequest {
        changed_files: request.changed_files,
        deleted_files: request.deleted_files,
        encrypt: request.encrypt,
    };

    let outcome = pampa_index::index_project(request.repo_path, &db, provider.as_ref(), &inner_request, on_progress).await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(tmp: &Path) {
        std::fs::create_dir_all(tmp.join("src")).unwrap();
        std::fs::write(
            tmp.join("src/checkout.php"),
            "<?php\nfunction createCheckoutSession() {\n  return true;\n}\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn creates_the_project_database_on_first_run() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());

        // "openai" resolves to the uniform-contract stub, which refuses
        // to embed; that's enough to exercise the wrapper's db-creation
        // and provider-resolution path without downloading a real model.
        let request = IndexProjectRequest {
            repo_path: tmp.path(),
            provider: "openai",
            changed_files: None,
            deleted_files: None,
            encrypt: EncryptPreference::Off,
        };
        let outcome = index_project(&request, None).await.unwrap();
        assert!(outcome.success, "per-chunk embed failures don't fail the whole run");
        assert_eq!(outcome.processed_chunks, 0);
        assert!(!outcome.errors.is_empty());
        assert!(tmp.path().join(".pampa").join("pampa.db").exists());
    }

    #[tokio::test]
    async fn unknown_provider_name_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_fixture(tmp.path());

        let request = IndexProjectRequest {
            repo_path: tmp.path(),
            provider: "not-a-real-provider",
            changed_files: None,
            deleted_files: None,
            encrypt: EncryptPreference::Off,
        };
        assert!(index_project(&request, None).await.is_err());
    }
}
