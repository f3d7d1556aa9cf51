//! Thin `repo_path`-resolving wrappers over `pampa-contextpack`'s
//! directory-rooted operations, matching the core API's
//! `list`/`load`/`setActive`/`resolveScope` operation names.

use std::path::Path;

use pampa_contextpack::{ActivePack, ContextPack, ContextPackError, PackEntry};
use pampa_core::{Scope, ScopeOverrides};

use crate::error::PampaError;

fn contextpacks_dir(repo_path: &Path) -> std::path::PathBuf {
    repo_path.join(".pampa").join("contextpacks")
}

/// Every context pack defined for this project, sorted by name.
#[must_use]
pub fn list(repo_path: &Path) -> Vec<PackEntry> {
    pampa_contextpack::list_packs(&contextpacks_dir(repo_path))
}

/// Load one pack by name, `Ok(None)` if it doesn't exist.
pub fn load(repo_path: &Path, name: &str) -> Result<Option<ContextPack>, PampaError> {
    Ok(pampa_contextpack::load_pack_by_name(&contextpacks_dir(repo_path), name)?)
}

/// Persist `name` as the project's active pack. Fails if no pack by
/// that name exists on disk.
pub fn set_active(repo_path: &Path, name: &str) -> Result<ActivePack, PampaError> {
    Ok(pampa_contextpack::set_active(&contextpacks_dir(repo_path), name)?)
}

/// Resolve the effective search scope from the active pack, an
/// optional per-session pack choice, and caller overrides.
pub fn resolve_scope(repo_path: &Path, overrides: &ScopeOverrides, session_pack: Option<&str>) -> Result<Scope, PampaError> {
    Ok(pampa_contextpack::resolve_scope(repo_path, overrides, session_pack)?)
}
