//! Accumulation of changed/deleted paths between flushes.
//!
//! Kept as plain data so it can be unit tested without standing up a
//! real OS watcher: [`crate::watcher`] only ever touches it through
//! [`PendingChanges::absorb`] and [`PendingChanges::drain`].

use std::collections::HashSet;
use std::path::Path;

use pampa_core::Language;
use pampa_core::ids::normalize_path;

/// Directory names a watch event under is never worth reacting to.
/// Mirrors `pampa_index::walker::IGNORED_DIRS` — kept as its own
/// constant so this crate doesn't need to reach into an orchestrator
/// module for a list this small.
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".git", ".pampa", "dist", "build", "tmp", ".tmp", "vendor"];

/// One notify event kind, collapsed to what the orchestrator cares
/// about: did the path appear/change, or did it go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Upserted,
    Removed,
}

/// `true` if any ancestor directory of `relative_path` is in
/// [`IGNORED_DIRS`].
pub fn is_ignored(relative_path: &str) -> bool {
    Path::new(relative_path).components().any(|c| IGNORED_DIRS.contains(&c.as_os_str().to_string_lossy().as_ref()))
}

/// `true` if this path has an extension the extractor understands and
/// it doesn't live under an ignored directory.
pub fn is_watchable(relative_path: &str) -> bool {
    !is_ignored(relative_path) && Language::from_path(relative_path).is_some()
}

#[derive(Debug, Default)]
pub struct PendingChanges {
    changed: HashSet<String>,
    deleted: HashSet<String>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }

    /// Record one relative path under the given change kind, ignoring
    /// anything outside the watched extension/directory set. A path
    /// re-appearing as `Upserted` after being queued as `Removed` (or
    /// vice versa) wins on whichever happens last.
    pub fn absorb(&mut self, relative_path: &str, kind: ChangeKind) {
        if !is_watchable(relative_path) {
            return;
        }
        let path = normalize_path(relative_path);
        match kind {
            ChangeKind::Upserted => {
                self.deleted.remove(&path);
                self.changed.insert(path);
            }
            ChangeKind::Removed => {
                self.changed.remove(&path);
                self.deleted.insert(path);
            }
        }
    }

    /// Take every pending path out, leaving both sets empty. A flush
    /// that fails should re-absorb its paths as `Upserted`/`Removed`
    /// so the next pass retries them.
    pub fn drain(&mut self) -> (Vec<String>, Vec<String>) {
        (self.changed.drain().collect(), self.deleted.drain().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_paths_under_vendor_directories() {
        let mut pending = PendingChanges::default();
        pending.absorb("vendor/lib/helper.php", ChangeKind::Upserted);
        assert!(pending.is_empty());
    }

    #[test]
    fn ignores_unsupported_extensions() {
        let mut pending = PendingChanges::default();
        pending.absorb("README.md", ChangeKind::Upserted);
        assert!(pending.is_empty());
    }

    #[test]
    fn absorbs_a_watchable_change() {
        let mut pending = PendingChanges::default();
        pending.absorb("src/checkout.php", ChangeKind::Upserted);
        let (changed, deleted) = pending.drain();
        assert_eq!(changed, vec!["src/checkout.php".to_string()]);
        assert!(deleted.is_empty());
    }

    #[test]
    fn a_later_removal_overrides_an_earlier_change() {
        let mut pending = PendingChanges::default();
        pending.absorb("src/checkout.php", ChangeKind::Upserted);
        pending.absorb("src/checkout.php", ChangeKind::Removed);
        let (changed, deleted) = pending.drain();
        assert!(changed.is_empty());
        assert_eq!(deleted, vec!["src/checkout.php".to_string()]);
    }

    #[test]
    fn drain_empties_the_pending_sets() {
        let mut pending = PendingChanges::default();
        pending.absorb("src/checkout.php", ChangeKind::Upserted);
        pending.drain();
        assert!(pending.is_empty());
    }
}
