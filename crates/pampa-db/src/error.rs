//! Database error types for pampa-db.

use thiserror::Error;

/// Errors from embedding store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("no result returned")]
    NoResult,

    #[error("invalid row data: {0}")]
    InvalidRow(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
