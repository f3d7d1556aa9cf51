//! # pampa-watch
//!
//! A debounced filesystem watcher that turns file edits into partial
//! `indexProject` runs: accumulate `add`/`change`/`unlink` events into
//! pending changed/deleted sets, flush them (serialized, so an event
//! arriving mid-flush just waits for the next one), and close cleanly
//! by running one final flush before the OS watcher stops.

pub mod error;
pub mod pending;
pub mod watcher;

pub use error::WatchError;
pub use pending::{ChangeKind, PendingChanges};
pub use watcher::{BatchCallback, DEFAULT_DEBOUNCE, MIN_DEBOUNCE, ProjectWatcher, ProviderFactory, WatchConfig};
