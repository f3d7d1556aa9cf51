//! A single context pack: a named, reusable [`ScopeOverrides`] preset
//! stored at `.pampa/contextpacks/{name}.json`.

use std::path::Path;

use pampa_core::ScopeOverrides;
use serde_json::Value;

use crate::error::ContextPackError;
use crate::schema::validate;

#[derive(Debug, Clone)]
pub struct ContextPack {
    pub name: String,
    pub scope: ScopeOverrides,
}

/// A directory listing entry: either a pack that parsed and validated,
/// or a placeholder carrying the name and embedded validation error —
/// one bad pack file MUST NOT fail the whole listing.
#[derive(Debug, Clone)]
pub enum PackEntry {
    Valid(ContextPack),
    Invalid { name: String, error: String },
}

impl ContextPack {
    pub fn load(path: &Path) -> Result<Self, ContextPackError> {
        let name = pack_name(path);
        let text = std::fs::read_to_string(path).map_err(|e| ContextPackError::Io { path: path.display().to_string(), source: e })?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ContextPackError::Invalid { name: name.clone(), errors: vec![e.to_string()] })?;
        validate(&name, &value)?;
        let scope: ScopeOverrides = serde_json::from_value(value)
            .map_err(|e| ContextPackError::Invalid { name: name.clone(), errors: vec![e.to_string()] })?;
        Ok(Self { name, scope })
    }
}

fn pack_name(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string()
}

/// Look up one pack by name (its filename stem), `Ok(None)` if absent.
pub fn load_pack_by_name(contextpacks_dir: &Path, name: &str) -> Result<Option<ContextPack>, ContextPackError> {
    let path = contextpacks_dir.join(format!("{name}.json"));
    if !path.exists() {
        return Ok(None);
    }
    ContextPack::load(&path).map(Some)
}

/// Enumerate every pack under `contextpacks_dir`, skipping
/// `active-pack.json` (state, not a pack definition) and non-JSON
/// files, sorted by name for a stable listing.
pub fn list_packs(contextpacks_dir: &Path) -> Vec<PackEntry> {
    let Ok(entries) = std::fs::read_dir(contextpacks_dir) else { return Vec::new() };
    let mut packs = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some("active-pack.json") {
            continue;
        }
        match ContextPack::load(&path) {
            Ok(pack) => packs.push(PackEntry::Valid(pack)),
            Err(e) => packs.push(PackEntry::Invalid { name: pack_name(&path), error: e.to_string() }),
        }
    }
    packs.sort_by(|a, b| entry_name(a).cmp(entry_name(b)));
    packs
}

fn entry_name(entry: &PackEntry) -> &str {
    match entry {
        PackEntry::Valid(p) => &p.name,
        PackEntry::Invalid { name, .. } => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_valid_pack() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("billing.json"), r#"{"tags": ["stripe"], "hybrid": true}"#).unwrap();
        let pack = load_pack_by_name(tmp.path(), "billing").unwrap().unwrap();
        assert_eq!(pack.name, "billing");
        assert_eq!(pack.scope.tags, Some(vec!["stripe".to_string()]));
        assert_eq!(pack.scope.hybrid, Some(true));
    }

    #[test]
    fn missing_pack_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_pack_by_name(tmp.path(), "nope").unwrap().is_none());
    }

    #[test]
    fn list_skips_active_pack_file_and_non_json() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("billing.json"), r#"{"tags": ["stripe"]}"#).unwrap();
        std::fs::write(tmp.path().join("active-pack.json"), r#"{"key": "billing", "appliedAt": "2026-01-01T00:00:00Z"}"#).unwrap();
        std::fs::write(tmp.path().join("README.md"), "not a pack").unwrap();
        let packs = list_packs(tmp.path());
        assert_eq!(packs.len(), 1);
        assert!(matches!(&packs[0], PackEntry::Valid(p) if p.name == "billing"));
    }

    #[test]
    fn list_surfaces_invalid_pack_without_failing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bad.json"), r#"{"reranker": "gpt4"}"#).unwrap();
        let packs = list_packs(tmp.path());
        assert_eq!(packs.len(), 1);
        assert!(matches!(&packs[0], PackEntry::Invalid { name, .. } if name == "bad"));
    }

    #[test]
    fn listing_a_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let packs = list_packs(&tmp.path().join("does-not-exist"));
        assert!(packs.is_empty());
    }
}
