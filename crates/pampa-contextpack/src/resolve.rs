//! Resolve the effective search [`Scope`] from the active pack, a
//! session-level override, and caller overrides, in that precedence
//! order.

use std::path::Path;

use pampa_core::{Scope, ScopeOverrides};

use crate::active;
use crate::error::ContextPackError;
use crate::pack;

const DEACTIVATE_KEYWORDS: &[&str] = &["clear", "none", "default"];

/// Merge (in order) the active pack's fields, then `overrides`, into a
/// fresh [`Scope`]. `session_pack` stands in for the MCP
/// `use_context_pack` tool's per-session choice: a name overrides the
/// persisted active pack for this resolution only; one of `"clear"`,
/// `"none"`, `"default"` deactivates it entirely (no pack applied).
pub fn resolve_scope(repo_root: &Path, overrides: &ScopeOverrides, session_pack: Option<&str>) -> Result<Scope, ContextPackError> {
    let contextpacks_dir = repo_root.join(".pampa").join("contextpacks");

    let active_key = match session_pack {
        Some(name) if DEACTIVATE_KEYWORDS.contains(&name) => None,
        Some(name) => Some(name.to_string()),
        None => active::load_active(&contextpacks_dir)?.map(|a| a.key),
    };

    let mut scope = Scope::default();
    if let Some(key) = active_key {
        match pack::load_pack_by_name(&contextpacks_dir, &key)? {
            Some(found) => scope = scope.merged_with(&found.scope),
            None => tracing::warn!(pack = %key, "active context pack not found on disk; ignoring"),
        }
    }
    Ok(scope.merged_with(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pack(dir: &Path, name: &str, json: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(format!("{name}.json")), json).unwrap();
    }

    #[test]
    fn no_pack_and_no_overrides_is_default_scope() {
        let tmp = tempfile::tempdir().unwrap();
        let scope = resolve_scope(tmp.path(), &ScopeOverrides::default(), None).unwrap();
        assert_eq!(scope.tags, Vec::<String>::new());
        assert!(scope.hybrid);
    }

    #[test]
    fn persisted_active_pack_applies() {
        let tmp = tempfile::tempdir().unwrap();
        let packs_dir = tmp.path().join(".pampa").join("contextpacks");
        write_pack(&packs_dir, "billing", r#"{"tags": ["stripe"], "hybrid": false}"#);
        crate::active::set_active(&packs_dir, "billing").unwrap();

        let scope = resolve_scope(tmp.path(), &ScopeOverrides::default(), None).unwrap();
        assert_eq!(scope.tags, vec!["stripe".to_string()]);
        assert!(!scope.hybrid);
    }

    #[test]
    fn session_pack_overrides_persisted_active_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let packs_dir = tmp.path().join(".pampa").join("contextpacks");
        write_pack(&packs_dir, "billing", r#"{"tags": ["stripe"]}"#);
        write_pack(&packs_dir, "auth", r#"{"tags": ["auth"]}"#);
        crate::active::set_active(&packs_dir, "billing").unwrap();

        let scope = resolve_scope(tmp.path(), &ScopeOverrides::default(), Some("auth")).unwrap();
        assert_eq!(scope.tags, vec!["auth".to_string()]);
    }

    #[test]
    fn deactivate_keyword_clears_the_session_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let packs_dir = tmp.path().join(".pampa").join("contextpacks");
        write_pack(&packs_dir, "billing", r#"{"tags": ["stripe"]}"#);
        crate::active::set_active(&packs_dir, "billing").unwrap();

        let scope = resolve_scope(tmp.path(), &ScopeOverrides::default(), Some("none")).unwrap();
        assert!(scope.tags.is_empty());
    }

    #[test]
    fn caller_overrides_win_over_the_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let packs_dir = tmp.path().join(".pampa").join("contextpacks");
        write_pack(&packs_dir, "billing", r#"{"hybrid": true}"#);
        crate::active::set_active(&packs_dir, "billing").unwrap();

        let overrides = ScopeOverrides { hybrid: Some(false), ..Default::default() };
        let scope = resolve_scope(tmp.path(), &overrides, None).unwrap();
        assert!(!scope.hybrid);
    }
}
