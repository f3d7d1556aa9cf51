//! Filesystem-backed chunk artifact store at `{repo}/.pampa/chunks/`.

use crate::envelope;
use crate::error::StoreError;
use crate::key::MasterKey;
use std::path::{Path, PathBuf};

/// Content-addressed store for chunk artifacts under a project's
/// `.pampa/chunks/` directory.
pub struct ChunkStore {
    chunks_dir: PathBuf,
}

impl ChunkStore {
    /// Open (creating if absent) the chunk store rooted at `repo_root/.pampa/chunks`.
    pub fn open(repo_root: &Path) -> Result<Self, StoreError> {
        let chunks_dir = repo_root.join(".pampa").join("chunks");
        std::fs::create_dir_all(&chunks_dir)
            .map_err(|e| StoreError::Io { path: chunks_dir.display().to_string(), source: e })?;
        Ok(Self { chunks_dir })
    }

    fn plain_path(&self, sha: &str) -> PathBuf {
        self.chunks_dir.join(format!("{sha}.gz"))
    }

    fn encrypted_path(&self, sha: &str) -> PathBuf {
        self.chunks_dir.join(format!("{sha}.gz.enc"))
    }

    /// Write a plain (non-encrypted) artifact, replacing any prior
    /// variant for this sha (plain or encrypted).
    pub fn write_plain(&self, sha: &str, code: &str) -> Result<(), StoreError> {
        let bytes = envelope::gzip(code)?;
        self.write_atomic(&self.plain_path(sha), &bytes)?;
        self.remove_if_exists(&self.encrypted_path(sha))
    }

    /// Write an encrypted artifact, replacing any prior variant.
    pub fn write_encrypted(&self, sha: &str, code: &str, master_key: &MasterKey) -> Result<(), StoreError> {
        let bytes = envelope::encrypt(code, master_key)?;
        self.write_atomic(&self.encrypted_path(sha), &bytes)?;
        self.remove_if_exists(&self.plain_path(sha))
    }

    /// Read an artifact back to its original UTF-8 code text,
    /// transparently decrypting if the artifact is the encrypted variant.
    pub fn read(&self, sha: &str, master_key: Option<&MasterKey>) -> Result<String, StoreError> {
        let plain = self.plain_path(sha);
        let encrypted = self.encrypted_path(sha);
        match (plain.exists(), encrypted.exists()) {
            (true, true) => Err(StoreError::AmbiguousVariant(sha.to_string())),
            (true, false) => {
                let bytes = std::fs::read(&plain)
                    .map_err(|e| StoreError::Io { path: plain.display().to_string(), source: e })?;
                envelope::gunzip(&bytes)
            }
            (false, true) => {
                let key = master_key
                    .ok_or_else(|| StoreError::EncryptionKeyRequired(format!("chunk {sha} is encrypted")))?;
                let bytes = std::fs::read(&encrypted)
                    .map_err(|e| StoreError::Io { path: encrypted.display().to_string(), source: e })?;
                envelope::decrypt(&bytes, key)
            }
            (false, false) => Err(StoreError::NotFound(sha.to_string())),
        }
    }

    /// Does this sha have a stored artifact (plain or encrypted)?
    #[must_use]
    pub fn exists(&self, sha: &str) -> bool {
        self.plain_path(sha).exists() || self.encrypted_path(sha).exists()
    }

    /// Remove both variants for a sha, if present.
    pub fn remove(&self, sha: &str) -> Result<(), StoreError> {
        self.remove_if_exists(&self.plain_path(sha))?;
        self.remove_if_exists(&self.encrypted_path(sha))
    }

    fn remove_if_exists(&self, path: &Path) -> Result<(), StoreError> {
        if path.exists() {
            std::fs::remove_file(path)
                .map_err(|e| StoreError::Io { path: path.display().to_string(), source: e })?;
        }
        Ok(())
    }

    /// Write `bytes` to `path` via a temp-file-plus-rename so a crash
    /// mid-write never leaves a truncated artifact behind.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("artifact");
        let tmp_path = path.with_file_name(format!("{file_name}.tmp-{}", std::process::id()));
        std::fs::write(&tmp_path, bytes)
            .map_err(|e| StoreError::Io { path: tmp_path.display().to_string(), source: e })?;
        std::fs::rename(&tmp_path, path)
            .map_err(|e| StoreError::Io { path: path.display().to_string(), source: e })?;
        Ok(())
    }
}
