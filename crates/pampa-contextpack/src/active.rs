//! The persisted `active-pack.json` record: `{key, appliedAt}`.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ContextPackError;
use crate::pack;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePack {
    pub key: String,
    #[serde(rename = "appliedAt")]
    pub applied_at: String,
}

/// Read `active-pack.json`, `None` if no pack has ever been activated.
pub fn load_active(contextpacks_dir: &Path) -> Result<Option<ActivePack>, ContextPackError> {
    let path = contextpacks_dir.join("active-pack.json");
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| ContextPackError::Io { path: path.display().to_string(), source: e })?;
    let active = serde_json::from_str(&text)
        .map_err(|e| ContextPackError::Invalid { name: "active-pack".to_string(), errors: vec![e.to_string()] })?;
    Ok(Some(active))
}

/// Activate `key`, persisting `{key, appliedAt}` next to the pack files.
/// Fails with `NotFound` if no pack by that name exists.
pub fn set_active(contextpacks_dir: &Path, key: &str) -> Result<ActivePack, ContextPackError> {
    if pack::load_pack_by_name(contextpacks_dir, key)?.is_none() {
        return Err(ContextPackError::NotFound(key.to_string()));
    }
    std::fs::create_dir_all(contextpacks_dir)
        .map_err(|e| ContextPackError::Io { path: contextpacks_dir.display().to_string(), source: e })?;
    let active = ActivePack { key: key.to_string(), applied_at: Utc::now().to_rfc3339() };
    let path = contextpacks_dir.join("active-pack.json");
    let text = serde_json::to_string_pretty(&active)
        .map_err(|e| ContextPackError::Invalid { name: "active-pack".to_string(), errors: vec![e.to_string()] })?;
    std::fs::write(&path, text).map_err(|e| ContextPackError::Io { path: path.display().to_string(), source: e })?;
    Ok(active)
}
