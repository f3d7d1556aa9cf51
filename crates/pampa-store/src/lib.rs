//! # pampa-store
//!
//! Content-addressed chunk artifact storage: gzip-compressed code text,
//! optionally wrapped in an AES-256-GCM envelope with an HKDF-derived
//! per-chunk key. See [`envelope`] for the wire format and [`ChunkStore`]
//! for the on-disk layout under `.pampa/chunks/`.

pub mod envelope;
pub mod error;
pub mod key;
pub mod store;

pub use error::StoreError;
pub use key::MasterKey;
pub use store::ChunkStore;
