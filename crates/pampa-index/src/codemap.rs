//! The version-controllable `pampa.codemap.json` mirror of chunk
//! metadata (spec §6.1's "Codemap chunk record fields").
//!
//! Every field named in the original spec is present; any field this
//! version of the code does not recognize is preserved verbatim on
//! round-trip via `#[serde(flatten)]` into `extra`.

use std::collections::BTreeMap;
use std::path::Path;

use pampa_core::{ChunkType, CodeChunk, Language};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IndexError;

/// One entry in `pampa.codemap.json`, keyed by `sha` in [`Codemap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodemapRecord {
    pub file: String,
    pub symbol: String,
    pub sha: String,
    pub lang: Language,
    #[serde(rename = "chunkType")]
    pub chunk_type: ChunkType,
    pub provider: String,
    pub dimensions: u32,
    #[serde(rename = "hasPampaTags")]
    pub has_pampa_tags: bool,
    #[serde(rename = "hasIntent")]
    pub has_intent: bool,
    #[serde(rename = "hasDocumentation")]
    pub has_documentation: bool,
    #[serde(rename = "variableCount")]
    pub variable_count: usize,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default = "default_path_weight")]
    pub path_weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
    #[serde(default)]
    pub success_rate: f32,
    pub encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_signature: Option<String>,
    #[serde(default)]
    pub symbol_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_return: Option<String>,
    #[serde(default)]
    pub symbol_calls: Vec<String>,
    #[serde(default)]
    pub symbol_call_targets: Vec<String>,
    #[serde(default)]
    pub symbol_callers: Vec<String>,
    #[serde(default)]
    pub symbol_neighbors: Vec<String>,

    /// Fields from a newer codemap version this build doesn't know
    /// about. Preserved verbatim on re-serialization.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_path_weight() -> f32 {
    1.0
}

impl CodemapRecord {
    #[must_use]
    pub fn from_chunk(chunk: &CodeChunk) -> Self {
        Self {
            file: chunk.file_path.clone(),
            symbol: chunk.symbol.clone(),
            sha: chunk.sha.clone(),
            lang: chunk.lang,
            chunk_type: chunk.chunk_type,
            provider: chunk.embedding_provider.clone(),
            dimensions: chunk.embedding_dimensions,
            has_pampa_tags: !chunk.tags.is_empty(),
            has_intent: chunk.intent.is_some(),
            has_documentation: chunk.doc_comments.is_some(),
            variable_count: chunk.variables.len(),
            synonyms: Vec::new(),
            path_weight: default_path_weight(),
            last_used_at: None,
            success_rate: 0.0,
            encrypted: chunk.encrypted,
            symbol_signature: chunk.signature.clone(),
            symbol_parameters: chunk.parameters.clone(),
            symbol_return: chunk.return_type.clone(),
            symbol_calls: chunk.calls.clone(),
            symbol_call_targets: chunk.call_targets.clone(),
            symbol_callers: chunk.callers.clone(),
            symbol_neighbors: chunk.symbol_neighbors.clone(),
            extra: Map::new(),
        }
    }

    /// Update the fields that change as a chunk is re-indexed in place,
    /// preserving the learned fields (`synonyms`, `path_weight`,
    /// `last_used_at`, `success_rate`) an earlier run recorded.
    pub fn refresh_from_chunk(&mut self, chunk: &CodeChunk) {
        let learned = (
            std::mem::take(&mut self.synonyms),
            self.path_weight,
            self.last_used_at.take(),
            self.success_rate,
        );
        *self = Self::from_chunk(chunk);
        self.synonyms = learned.0;
        self.path_weight = learned.1;
        self.last_used_at = learned.2;
        self.success_rate = learned.3;
    }
}

/// `sha -> CodemapRecord`, ordered by sha for stable JSON output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Codemap {
    #[serde(flatten)]
    pub records: BTreeMap<String, CodemapRecord>,
}

impl Codemap {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| IndexError::Io { path: path.display().to_string(), source: e })?;
        serde_json::from_str(&text).map_err(|e| IndexError::CodemapCorrupt(e.to_string()))
    }

    /// Write `pampa.codemap.json`, pretty-printed with a 2-space indent.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, serde_json::ser::PrettyFormatter::with_indent(b"  "));
        serde::Serialize::serialize(self, &mut serializer).map_err(|e| IndexError::CodemapCorrupt(e.to_string()))?;
        std::fs::write(path, buf).map_err(|e| IndexError::Io { path: path.display().to_string(), source: e })
    }

    #[must_use]
    pub fn has_chunk(&self, sha: &str) -> bool {
        self.records.contains_key(sha)
    }

    pub fn upsert(&mut self, chunk: &CodeChunk) {
        self.records
            .entry(chunk.sha.clone())
            .and_modify(|r| r.refresh_from_chunk(chunk))
            .or_insert_with(|| CodemapRecord::from_chunk(chunk));
    }

    pub fn remove(&mut self, sha: &str) -> Option<CodemapRecord> {
        self.records.remove(sha)
    }

    /// Shas belonging to `file_path` no longer present in `current_shas`
    /// (the stale-chunk-removal rule from the original Merkle section).
    #[must_use]
    pub fn stale_shas_for_file(&self, file_path: &str, current_shas: &std::collections::HashSet<&str>) -> Vec<String> {
        self.records
            .values()
            .filter(|r| r.file == file_path && !current_shas.contains(r.sha.as_str()))
            .map(|r| r.sha.clone())
            .collect()
    }

    #[must_use]
    pub fn shas_for_file(&self, file_path: &str) -> Vec<String> {
        self.records.values().filter(|r| r.file == file_path).map(|r| r.sha.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::ids::{chunk_id, content_sha};

    fn sample_chunk(file: &str, symbol: &str, code: &str) -> CodeChunk {
        let sha = content_sha(code);
        let now = chrono::Utc::now();
        CodeChunk {
            chunk_id: chunk_id(file, symbol, &sha),
            file_path: file.to_string(),
            symbol: symbol.to_string(),
            sha,
            lang: Language::Php,
            chunk_type: ChunkType::Function,
            embedding_provider: "local".to_string(),
            embedding_dimensions: 384,
            embedding: vec![0.0; 384],
            tags: vec!["stripe".to_string()],
            intent: None,
            description: None,
            doc_comments: None,
            variables: Vec::new(),
            context_info: None,
            signature: None,
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

    #[test]
    fn upsert_then_has_chunk() {
        let mut map = Codemap::default();
        let chunk = sample_chunk("a.php", "createCheckoutSession", "function createCheckoutSession() {}");
        map.upsert(&chunk);
        assert!(map.has_chunk(&chunk.sha));
        assert_eq!(map.records[&chunk.sha].has_pampa_tags, true);
    }

    #[test]
    fn refresh_preserves_learned_fields() {
        let mut map = Codemap::default();
        let chunk = sample_chunk("a.php", "f", "function f() {}");
        map.upsert(&chunk);
        {
            let record = map.records.get_mut(&chunk.sha).unwrap();
            record.synonyms.push("crear".to_string());
            record.path_weight = 2.5;
            record.success_rate = 0.9;
        }
        map.upsert(&chunk);
        let record = &map.records[&chunk.sha];
        assert_eq!(record.synonyms, vec!["crear".to_string()]);
        assert_eq!(record.path_weight, 2.5);
        assert_eq!(record.success_rate, 0.9);
    }

    #[test]
    fn stale_shas_exclude_current() {
        let mut map = Codemap::default();
        let a = sample_chunk("a.php", "f", "function f() {}");
        let b = sample_chunk("a.php", "g", "function g() {}");
        map.upsert(&a);
        map.upsert(&b);
        let current: std::collections::HashSet<&str> = [a.sha.as_str()].into_iter().collect();
        assert_eq!(map.stale_shas_for_file("a.php", &current), vec![b.sha.clone()]);
    }

    #[test]
    fn unknown_fields_round_trip_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pampa.codemap.json");
        let text = r#"{
            "deadbeef": {
                "file": "a.php", "symbol": "f", "sha": "deadbeef", "lang": "php",
                "chunkType": "function", "provider": "local", "dimensions": 384,
                "hasPampaTags": false, "hasIntent": false, "hasDocumentation": false,
                "variableCount": 0, "encrypted": false, "futureField": "kept"
            }
        }"#;
        std::fs::write(&path, text).unwrap();
        let map = Codemap::load(&path).unwrap();
        assert_eq!(map.records["deadbeef"].extra.get("futureField").unwrap(), "kept");
        map.save(&path).unwrap();
        let reloaded = Codemap::load(&path).unwrap();
        assert_eq!(reloaded.records["deadbeef"].extra.get("futureField").unwrap(), "kept");
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.json");
        let map = Codemap::load(&path).unwrap();
        assert!(map.records.is_empty());
    }
}
