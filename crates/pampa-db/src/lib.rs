//! # pampa-db
//!
//! libSQL-backed embedding store: `code_chunks`, `intention_cache`, and
//! `query_patterns` tables behind [`PampaDb`]. Uses the `libsql` crate
//! (C SQLite fork) so a project's `.pampa/pampa.db` stays a plain
//! SQLite file on disk while giving callers an async connection API.

pub mod db;
pub mod error;
mod repos;

pub use db::PampaDb;
pub use error::DatabaseError;
pub use repos::{IntentionMapping, QueryPattern};
