//! Per-file/per-chunk fast hashes used to skip unchanged work.
//!
//! Persisted at `.pampa/merkle.json`: `{ relative_path -> { shaFile,
//! chunkShas[] } }`. `fastHash` is `xxhash64`, rendered as a decimal
//! string — fast and non-cryptographic, unlike the SHA-1 content hash
//! used for chunk identity.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// `xxhash64(bytes)`, rendered as a decimal string.
#[must_use]
pub fn fast_hash(bytes: &[u8]) -> String {
    xxhash_rust::xxh64::xxh64(bytes, 0).to_string()
}

/// One file's entry in the Merkle map: its whole-file hash plus the
/// hashes of each chunk extracted from it, in extraction order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerkleFileEntry {
    #[serde(rename = "shaFile")]
    pub sha_file: String,
    #[serde(rename = "chunkShas")]
    pub chunk_shas: Vec<String>,
}

/// `relative_path -> MerkleFileEntry`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerkleMap {
    #[serde(flatten)]
    pub files: HashMap<String, MerkleFileEntry>,
}

impl MerkleMap {
    /// Load `.pampa/merkle.json`, or an empty map if it does not exist yet.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| IndexError::Io { path: path.display().to_string(), source: e })?;
        serde_json::from_str(&text).map_err(|e| IndexError::MerkleCorrupt(e.to_string()))
    }

    /// Write `.pampa/merkle.json`, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let text = serde_json::to_string_pretty(self).map_err(|e| IndexError::MerkleCorrupt(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| IndexError::Io { path: path.display().to_string(), source: e })
    }

    /// A file is unchanged iff its current `shaFile` matches the stored
    /// value AND every one of its chunk ids still has a codemap entry.
    #[must_use]
    pub fn is_file_unchanged(&self, relative_path: &str, current_sha_file: &str, codemap_has_chunk: impl Fn(&str) -> bool) -> bool {
        let Some(entry) = self.files.get(relative_path) else { return false };
        if entry.sha_file != current_sha_file {
            return false;
        }
        entry.chunk_shas.iter().all(|sha| codemap_has_chunk(sha))
    }

    pub fn record(&mut self, relative_path: &str, sha_file: String, chunk_shas: Vec<String>) {
        self.files.insert(relative_path.to_string(), MerkleFileEntry { sha_file, chunk_shas });
    }

    pub fn remove(&mut self, relative_path: &str) -> Option<MerkleFileEntry> {
        self.files.remove(relative_path)
    }

    /// Paths present here but missing from `existing_paths` (used to
    /// purge deleted files on a full, non-partial run).
    #[must_use]
    pub fn paths_absent_from(&self, existing_paths: &std::collections::HashSet<String>) -> Vec<String> {
        self.files.keys().filter(|p| !existing_paths.contains(p.as_str())).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_hash_is_deterministic() {
        assert_eq!(fast_hash(b"hello"), fast_hash(b"hello"));
        assert_ne!(fast_hash(b"hello"), fast_hash(b"world"));
    }

    #[test]
    fn unchanged_file_requires_matching_sha_and_present_chunks() {
        let mut map = MerkleMap::default();
        map.record("a.php", "sha1".to_string(), vec!["c1".to_string()]);
        assert!(map.is_file_unchanged("a.php", "sha1", |_| true));
        assert!(!map.is_file_unchanged("a.php", "sha2", |_| true), "changed file hash");
        assert!(!map.is_file_unchanged("a.php", "sha1", |_| false), "chunk missing from codemap");
    }

    #[test]
    fn unknown_file_is_always_changed() {
        let map = MerkleMap::default();
        assert!(!map.is_file_unchanged("new.php", "sha1", |_| true));
    }

    #[test]
    fn paths_absent_from_detects_deleted_files() {
        let mut map = MerkleMap::default();
        map.record("a.php", "sha1".to_string(), vec![]);
        map.record("b.php", "sha2".to_string(), vec![]);
        let existing: std::collections::HashSet<String> = ["a.php".to_string()].into_iter().collect();
        assert_eq!(map.paths_absent_from(&existing), vec!["b.php".to_string()]);
    }

    #[test]
    fn round_trips_through_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("merkle.json");
        let mut map = MerkleMap::default();
        map.record("a.php", "sha1".to_string(), vec!["c1".to_string(), "c2".to_string()]);
        map.save(&path).unwrap();
        let loaded = MerkleMap::load(&path).unwrap();
        assert_eq!(loaded.files["a.php"].sha_file, "sha1");
        assert_eq!(loaded.files["a.php"].chunk_shas, vec!["c1", "c2"]);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("does-not-exist.json");
        let map = MerkleMap::load(&path).unwrap();
        assert!(map.files.is_empty());
    }
}
