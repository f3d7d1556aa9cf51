//! # pampa-contextpack
//!
//! Context packs: named, version-controllable [`pampa_core::ScopeOverrides`]
//! presets stored under `.pampa/contextpacks/`, plus the persisted
//! active-pack record and the scope-resolution precedence rule that
//! ties an active pack, a session override, and caller overrides
//! together into one effective [`pampa_core::Scope`].

pub mod active;
pub mod error;
pub mod pack;
pub mod resolve;
pub mod schema;

pub use active::{ActivePack, load_active, set_active};
pub use error::ContextPackError;
pub use pack::{ContextPack, PackEntry, list_packs, load_pack_by_name};
pub use resolve::resolve_scope;
