//! Resolving a project's `.pampa/pampa.db` path and opening it only
//! when it already exists, for operations that must report
//! `database_not_found` rather than silently create an empty database.

use std::path::{Path, PathBuf};

use pampa_db::PampaDb;

use crate::error::PampaError;

#[must_use]
pub fn db_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".pampa").join("pampa.db")
}

/// Open the project database, `Ok(None)` if it hasn't been created yet
/// (i.e. `indexProject` has never run for this repo).
pub async fn open_existing(repo_root: &Path) -> Result<Option<PampaDb>, PampaError> {
    let path = db_path(repo_root);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(PampaDb::open_local(&path.to_string_lossy()).await?))
}
