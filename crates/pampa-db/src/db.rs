//! Connection handle and migration runner for the embedding store.

use crate::error::DatabaseError;

const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

/// libSQL-backed embedding store for one project's `.pampa/pampa.db`.
pub struct PampaDb {
    conn: libsql::Connection,
}

impl PampaDb {
    /// Open (or create) the database file at `db_path`, running
    /// migrations before returning.
    pub async fn open_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(db_path).build().await?;
        let conn = db.connect()?;
        let store = Self { conn };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Open an in-memory database, for tests.
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open_local(":memory:").await
    }

    /// The underlying libSQL connection, for repo-module queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))
    }
}

/// Encode an embedding vector as little-endian `f32` bytes for BLOB storage.
#[must_use]
pub fn encode_embedding(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decode an embedding BLOB back into `f32` values.
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>, DatabaseError> {
    if bytes.len() % 4 != 0 {
        return Err(DatabaseError::InvalidRow("embedding blob length not a multiple of 4".to_string()));
    }
    Ok(bytes.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
}
