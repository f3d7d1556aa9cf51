//! JSON Schema for a context-pack document's scope-default fields.

use std::sync::LazyLock;

use serde_json::{Value, json};

use crate::error::ContextPackError;

/// The scope-key shape from the original spec's ContextPack entity:
/// `path_glob, tags, lang, provider, reranker, hybrid, bm25,
/// symbol_boost`, every key optional. Bool-like fields accept a JSON
/// boolean.
static PACK_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "additionalProperties": true,
        "properties": {
            "path_glob": { "type": ["string", "null"] },
            "tags": { "type": "array", "items": { "type": "string" } },
            "lang": { "type": "array", "items": { "type": "string" } },
            "provider": { "type": ["string", "null"] },
            "reranker": { "enum": ["off", "transformers"] },
            "hybrid": { "type": "boolean" },
            "bm25": { "type": "boolean" },
            "symbol_boost": { "type": "boolean" }
        }
    })
});

/// Validate `instance` against the context-pack schema, collecting
/// every error rather than stopping at the first (list operation
/// reports invalid packs with the validation error embedded).
pub fn validate(name: &str, instance: &Value) -> Result<(), ContextPackError> {
    let validator = jsonschema::validator_for(&PACK_SCHEMA).expect("pack schema is a fixed, valid literal");
    let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
    if errors.is_empty() { Ok(()) } else { Err(ContextPackError::Invalid { name: name.to_string(), errors }) }
}
