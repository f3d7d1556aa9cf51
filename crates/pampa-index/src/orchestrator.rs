//! Index/update orchestrator: walks files, consults the Merkle map,
//! extracts and embeds chunks, writes artifacts and rows, and finally
//! rewrites the Merkle map and codemap (in that order — the codemap is
//! authoritative and is always written last).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use pampa_core::ids::{chunk_id, content_sha, normalize_path};
use pampa_core::CodeChunk;
use pampa_core::Language;
use pampa_db::PampaDb;
use pampa_embeddings::input::{EmbeddingInputFields, build_embedding_input};
use pampa_embeddings::provider::EmbeddingProvider;
use pampa_parser::ExtractedChunk;
use pampa_store::{ChunkStore, MasterKey};

use crate::codemap::Codemap;
use crate::error::{IndexError, RunError, RunErrorKind};
use crate::merkle::{MerkleMap, fast_hash};
use crate::walker::walk_source_files;

/// Encryption preference passed to `indexProject` (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptPreference {
    On,
    Off,
    #[default]
    Unset,
}

/// Resolve the effective master key for this run per §4.3's preference
/// table. `on` fails fast on a missing/malformed key; `unset` silently
/// falls back to unencrypted storage, logging once.
pub fn resolve_encryption(pref: EncryptPreference) -> Result<Option<MasterKey>, IndexError> {
    match pref {
        EncryptPreference::Off => Ok(None),
        EncryptPreference::On => MasterKey::from_env().map(Some).map_err(IndexError::from),
        EncryptPreference::Unset => match MasterKey::from_env() {
            Ok(key) => Ok(Some(key)),
            Err(_) => {
                tracing::warn!("PAMPA_ENCRYPTION_KEY absent or invalid; indexing without encryption");
                Ok(None)
            }
        },
    }
}

/// One `indexProject` invocation's inputs.
pub struct IndexRequest<'a> {
    /// Relative paths to (re)index. `None` triggers a full tree walk.
    pub changed_files: Option<&'a [String]>,
    /// Relative paths to purge. Only meaningful alongside `changed_files`.
    pub deleted_files: Option<&'a [String]>,
    pub encrypt: EncryptPreference,
}

/// Reported once per file as it finishes processing.
pub struct IndexProgress<'a> {
    pub file_path: &'a str,
    pub files_done: usize,
    pub files_total: usize,
}

/// Result of `indexProject`, per §6.3.
pub struct IndexOutcome {
    pub success: bool,
    pub processed_chunks: usize,
    pub total_chunks: usize,
    pub provider: String,
    pub errors: Vec<RunError>,
}

/// Run one indexing pass over `repo_root`.
pub async fn index_project(
    repo_root: &Path,
    db: &PampaDb,
    provider: &dyn EmbeddingProvider,
    request: &IndexRequest<'_>,
    on_progress: Option<&(dyn Fn(&IndexProgress<'_>) + Sync)>,
) -> Result<IndexOutcome, IndexError> {
    let store = ChunkStore::open(repo_root)?;
    let master_key = resolve_encryption(request.encrypt)?;

    let codemap_path = repo_root.join("pampa.codemap.json");
    let merkle_path = repo_root.join(".pampa").join("merkle.json");
    let mut codemap = Codemap::load(&codemap_path)?;
    let mut merkle = MerkleMap::load(&merkle_path)?;

    let is_partial = request.changed_files.is_some() || request.deleted_files.is_some();

    let candidate_files: Vec<String> = match request.changed_files {
        Some(changed) => changed.iter().map(|p| normalize_path(p)).collect(),
        None => walk_source_files(repo_root),
    };

    let deleted: Vec<String> = request.deleted_files.map_or_else(Vec::new, |d| d.iter().map(|p| normalize_path(p)).collect());

    for file_path in &deleted {
        remove_file(&mut codemap, &mut merkle, db, &store, file_path).await?;
    }

    if !is_partial {
        let existing: HashSet<String> = candidate_files.iter().cloned().collect();
        for file_path in merkle.paths_absent_from(&existing) {
            remove_file(&mut codemap, &mut merkle, db, &store, &file_path).await?;
        }
    }

    let mut errors = Vec::new();
    let mut new_chunks: Vec<CodeChunk> = Vec::new();
    let files_total = candidate_files.len();

    for (index, file_path) in candidate_files.iter().enumerate() {
        if deleted.contains(file_path) {
            continue;
        }
        let Some(lang) = Language::from_path(file_path) else { continue };
        let abs_path = repo_root.join(file_path);

        let source = match std::fs::read_to_string(&abs_path) {
            Ok(text) => text,
            Err(e) => {
                errors.push(RunError { file_path: file_path.clone(), kind: RunErrorKind::ProcessingError, message: e.to_string() });
                continue;
            }
        };

        let file_sha = fast_hash(source.as_bytes());
        if merkle.is_file_unchanged(file_path, &file_sha, |sha| codemap.has_chunk(sha)) {
            continue;
        }

        let extracted = match pampa_parser::extract(file_path, &source, lang) {
            Ok(chunks) => chunks,
            Err(e) => {
                errors.push(RunError { file_path: file_path.clone(), kind: RunErrorKind::FallbackError, message: e.to_string() });
                continue;
            }
        };

        let mut file_chunk_shas = Vec::new();
        for candidate in &extracted {
            match build_chunk(&store, provider, master_key.as_ref(), file_path, candidate).await {
                Ok(chunk) => {
                    file_chunk_shas.push(chunk.sha.clone());
                    new_chunks.push(chunk);
                }
                Err(e) => {
                    errors.push(RunError { file_path: file_path.clone(), kind: RunErrorKind::IndexingError, message: e.to_string() });
                }
            }
        }

        let current: HashSet<&str> = file_chunk_shas.iter().map(String::as_str).collect();
        remove_stale_chunks(&mut codemap, db, &store, file_path, &current).await?;
        merkle.record(file_path, file_sha, file_chunk_shas);

        if let Some(callback) = on_progress {
            callback(&IndexProgress { file_path, files_done: index + 1, files_total });
        }
    }

    attach_call_graph(&mut new_chunks);

    let processed_chunks = new_chunks.len();
    for chunk in &new_chunks {
        db.upsert_chunk(chunk).await?;
        codemap.upsert(chunk);
    }

    merkle.save(&merkle_path)?;
    codemap.save(&codemap_path)?;

    Ok(IndexOutcome {
        success: true,
        processed_chunks,
        total_chunks: codemap.records.len(),
        provider: provider.name().to_string(),
        errors,
    })
}

async fn build_chunk(
    store: &ChunkStore,
    provider: &dyn EmbeddingProvider,
    master_key: Option<&MasterKey>,
    file_path: &str,
    candidate: &ExtractedChunk,
) -> Result<CodeChunk, IndexError> {
    let sha = content_sha(&candidate.code);
    let id = chunk_id(file_path, &candidate.symbol, &sha);

    let variable_names: Vec<String> = candidate.variables.iter().map(|v| v.name.clone()).collect();
    let input_text = build_embedding_input(&EmbeddingInputFields {
        doc_comments: candidate.doc_comment.as_deref(),
        code: &candidate.code,
        intent: candidate.intent.as_deref(),
        description: candidate.description.as_deref(),
        tags: &candidate.tags,
        variables: &variable_names,
    });
    let truncated = provider.truncate(&input_text);
    let mut embeddings = provider.embed(std::slice::from_ref(&truncated)).await?;
    let embedding = embeddings.pop().ok_or(IndexError::EmptyEmbedding)?;

    match master_key {
        Some(key) => store.write_encrypted(&sha, &candidate.code, key)?,
        None => store.write_plain(&sha, &candidate.code)?,
    }

    let now = Utc::now();
    Ok(CodeChunk {
        chunk_id: id,
        file_path: file_path.to_string(),
        symbol: candidate.symbol.clone(),
        sha,
        lang: candidate.lang,
        chunk_type: candidate.chunk_type,
        embedding_provider: provider.name().to_string(),
        embedding_dimensions: provider.dimensions(),
        embedding,
        tags: candidate.tags.clone(),
        intent: candidate.intent.clone(),
        description: candidate.description.clone(),
        doc_comments: candidate.doc_comment.clone(),
        variables: candidate.variables.clone(),
        context_info: None,
        signature: Some(candidate.signature.clone()),
        parameters: candidate.parameters.clone(),
        return_type: candidate.return_type.clone(),
        calls: candidate.calls.clone(),
        call_targets: Vec::new(),
        callers: Vec::new(),
        symbol_neighbors: Vec::new(),
        encrypted: master_key.is_some(),
        created_at: now,
        updated_at: now,
    })
}

/// Resolve outgoing call names to target shas and propagate callers,
/// scoped to the chunks processed in this run (a project-wide symbol
/// table would need to re-touch every historical chunk on every
/// partial run; see DESIGN.md).
fn attach_call_graph(chunks: &mut [CodeChunk]) {
    let mut by_symbol: HashMap<String, Vec<String>> = HashMap::new();
    for chunk in chunks.iter() {
        by_symbol.entry(chunk.symbol.clone()).or_default().push(chunk.sha.clone());
    }

    let mut callers: HashMap<String, Vec<String>> = HashMap::new();
    for chunk in chunks.iter_mut() {
        let mut targets = Vec::new();
        for call_name in &chunk.calls {
            let Some(shas) = by_symbol.get(call_name) else { continue };
            for target_sha in shas {
                if *target_sha == chunk.sha || targets.contains(target_sha) {
                    continue;
                }
                targets.push(target_sha.clone());
                callers.entry(target_sha.clone()).or_default().push(chunk.sha.clone());
            }
        }
        chunk.call_targets = targets;
    }

    for chunk in chunks.iter_mut() {
        if let Some(found) = callers.remove(&chunk.sha) {
            chunk.callers = found;
        }
        chunk.rebuild_neighbors();
    }
}

async fn remove_file(codemap: &mut Codemap, merkle: &mut MerkleMap, db: &PampaDb, store: &ChunkStore, file_path: &str) -> Result<(), IndexError> {
    for sha in codemap.shas_for_file(file_path) {
        codemap.remove(&sha);
        store.remove(&sha)?;
    }
    db.delete_chunks_for_file(file_path).await?;
    merkle.remove(file_path);
    Ok(())
}

async fn remove_stale_chunks(
    codemap: &mut Codemap,
    db: &PampaDb,
    store: &ChunkStore,
    file_path: &str,
    current_shas: &HashSet<&str>,
) -> Result<(), IndexError> {
    for sha in codemap.stale_shas_for_file(file_path, current_shas) {
        if let Some(record) = codemap.records.get(&sha) {
            let id = chunk_id(&record.file, &record.symbol, &sha);
            db.delete_chunk(&id).await?;
        }
        codemap.remove(&sha);
        store.remove(&sha)?;
    }
    Ok(())
}
