//! Debounced filesystem watcher driving incremental `indexProject` runs.
//!
//! One `notify-debouncer-full` instance watches the project root
//! recursively; every debounced batch it delivers is folded into a
//! pending changed/deleted set, then a flush attempts to run
//! `pampa_index::index_project` with that partial request. A single
//! task owns the pending sets and runs flushes one at a time, so an
//! event arriving mid-flush only updates the pending sets — it's
//! picked up by the flush that runs after, not a concurrent one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::{DebounceEventResult, Debouncer, FileIdMap, new_debouncer};
use pampa_db::PampaDb;
use pampa_embeddings::EmbeddingProvider;
use pampa_index::{EncryptPreference, IndexOutcome, IndexRequest, index_project};
use tokio::sync::{Notify, mpsc};

use crate::error::WatchError;
use crate::pending::{ChangeKind, PendingChanges};

/// Default debounce window (§4.10). Callers may widen or narrow it,
/// but never below [`MIN_DEBOUNCE`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const MIN_DEBOUNCE: Duration = Duration::from_millis(50);

/// Factory invoked at most once, lazily, the first time a flush needs
/// an embedding provider. Its result is memoized; a failure is logged
/// once and retried on the next flush rather than crashing the loop.
pub type ProviderFactory = Box<dyn Fn() -> Result<Box<dyn EmbeddingProvider>, pampa_embeddings::EmbeddingError> + Send + Sync>;

/// Invoked after each flush that actually processed a non-empty batch,
/// with the relative paths that were upserted and deleted.
pub type BatchCallback = Box<dyn Fn(&[String], &[String]) + Send + Sync>;

pub struct WatchConfig {
    pub debounce: Duration,
    pub encrypt: EncryptPreference,
    pub on_batch: Option<BatchCallback>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE, encrypt: EncryptPreference::Unset, on_batch: None }
    }
}

impl WatchConfig {
    fn debounce_clamped(&self) -> Duration {
        self.debounce.max(MIN_DEBOUNCE)
    }
}

/// A running watch session. Drop is best-effort cleanup; call
/// [`ProjectWatcher::close`] to guarantee the final flush completes
/// before the watcher stops.
pub struct ProjectWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher, FileIdMap>,
    shutdown: Arc<Notify>,
    flush_requested: Arc<Notify>,
    flush_done: Arc<Notify>,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl ProjectWatcher {
    /// Start watching `repo_root`. `provider_factory` is called lazily
    /// on the first flush that needs embeddings, not at construction.
    pub fn start(repo_root: PathBuf, db: Arc<PampaDb>, provider_factory: ProviderFactory, config: WatchConfig) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::unbounded_channel::<DebounceEventResult>();
        let debounce = config.debounce_clamped();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            let _ = tx.send(result);
        })?;
        debouncer.watcher().watch(&repo_root, RecursiveMode::Recursive)?;
        debouncer.cache().add_root(&repo_root, RecursiveMode::Recursive);

        let shutdown = Arc::new(Notify::new());
        let flush_requested = Arc::new(Notify::new());
        let flush_done = Arc::new(Notify::new());
        let worker = tokio::spawn(run_loop(
            repo_root,
            db,
            provider_factory,
            config,
            rx,
            shutdown.clone(),
            flush_requested.clone(),
            flush_done.clone(),
        ));

        Ok(Self { _debouncer: debouncer, shutdown, flush_requested, flush_done, worker: Some(worker) })
    }

    /// Force whatever is pending to flush now, without waiting for the
    /// debounce window to settle, and wait for that flush to complete.
    pub async fn flush(&self) {
        self.flush_requested.notify_one();
        self.flush_done.notified().await;
    }

    /// Cancel the event loop, run one last flush of whatever is
    /// pending, wait for it, then close the underlying OS watcher.
    pub async fn close(mut self) {
        self.shutdown.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
        // _debouncer is dropped here, unwatching the root.
    }

    /// Block until the currently-running (or next) flush completes.
    /// Intended for tests; production callers normally don't wait.
    #[cfg(test)]
    async fn wait_for_flush(&self) {
        self.flush_done.notified().await;
    }
}

async fn run_loop(
    repo_root: PathBuf,
    db: Arc<PampaDb>,
    provider_factory: ProviderFactory,
    config: WatchConfig,
    mut rx: mpsc::UnboundedReceiver<DebounceEventResult>,
    shutdown: Arc<Notify>,
    flush_requested: Arc<Notify>,
    flush_done: Arc<Notify>,
) {
    let mut pending = PendingChanges::default();
    let mut provider: Option<Box<dyn EmbeddingProvider>> = None;

    loop {
        tokio::select! {
            biased;
            () = shutdown.notified() => {
                if !pending.is_empty() {
                    flush(&repo_root, &db, &provider_factory, &mut provider, &config, &mut pending).await;
                }
                flush_done.notify_waiters();
                return;
            }
            () = flush_requested.notified() => {
                flush(&repo_root, &db, &provider_factory, &mut provider, &config, &mut pending).await;
                flush_done.notify_waiters();
            }
            received = rx.recv() => {
                match received {
                    Some(result) => {
                        absorb_result(&repo_root, &mut pending, result);
                        flush(&repo_root, &db, &provider_factory, &mut provider, &config, &mut pending).await;
                        flush_done.notify_waiters();
                    }
                    None => return,
                }
            }
        }
    }
}

fn absorb_result(repo_root: &Path, pending: &mut PendingChanges, result: DebounceEventResult) {
    match result {
        Ok(events) => {
            for event in events {
                let kind = if event.paths.iter().any(|p| p.exists()) { ChangeKind::Upserted } else { ChangeKind::Removed };
                for path in &event.paths {
                    let Ok(relative) = path.strip_prefix(repo_root) else { continue };
                    pending.absorb(&relative.to_string_lossy().replace('\\', "/"), kind);
                }
            }
        }
        Err(errors) => {
            for error in errors {
                tracing::warn!(%error, "filesystem watcher error");
            }
        }
    }
}

async fn flush(
    repo_root: &Path,
    db: &PampaDb,
    provider_factory: &ProviderFactory,
    provider_slot: &mut Option<Box<dyn EmbeddingProvider>>,
    config: &WatchConfig,
    pending: &mut PendingChanges,
) {
    if pending.is_empty() {
        return;
    }
    let (changed, deleted) = pending.drain();

    let provider = match provider_slot {
        Some(p) => &**p,
        None => match provider_factory() {
            Ok(p) => {
                *provider_slot = Some(p);
                provider_slot.as_ref().unwrap().as_ref()
            }
            Err(e) => {
                tracing::error!(error = %e, "embedding provider init failed; dropping this flush");
                for path in changed {
                    pending.absorb(&path, ChangeKind::Upserted);
                }
                for path in deleted {
                    pending.absorb(&path, ChangeKind::Removed);
                }
                return;
            }
        },
    };

    let request = IndexRequest { changed_files: Some(&changed), deleted_files: Some(&deleted), encrypt: config.encrypt };
    match index_project(repo_root, db, provider, &request, None).await {
        Ok(IndexOutcome { errors, .. }) if errors.is_empty() => {
            if let Some(on_batch) = &config.on_batch {
                on_batch(&changed, &deleted);
            }
        }
        Ok(IndexOutcome { errors, .. }) => {
            for error in &errors {
                tracing::warn!(file = %error.file_path, message = %error.message, "watch-triggered reindex reported an error");
            }
            if let Some(on_batch) = &config.on_batch {
                on_batch(&changed, &deleted);
            }
        }
        Err(e) => tracing::error!(error = %e, "watch-triggered reindex failed"),
    }
}
