//! `startWatch`: wire `pampa_watch::ProjectWatcher` to a named embedding
//! provider and expose the `{ready, close(), flush()}` handle shape.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pampa_db::PampaDb;
use pampa_watch::{BatchCallback, ProjectWatcher, WatchConfig};

use crate::error::PampaError;
use crate::project_db;

pub struct StartWatchRequest<'a> {
    pub repo_path: &'a Path,
    pub provider: &'a str,
    /// `None` keeps `pampa_watch`'s default (500ms, clamped to a 50ms floor).
    pub debounce_ms: Option<u64>,
    pub encrypt: pampa_index::EncryptPreference,
    pub on_batch: Option<BatchCallback>,
}

/// A running watch session. `ready` is `true` once the database exists
/// and the OS watcher is attached; `close`/`flush` delegate to the
/// inner [`ProjectWatcher`].
pub struct WatchHandle {
    pub ready: bool,
    inner: ProjectWatcher,
}

impl WatchHandle {
    pub async fn flush(&self) {
        self.inner.flush().await;
    }

    pub async fn close(self) {
        self.inner.close().await;
    }
}

/// Start watching `request.repo_path`, creating `.pampa/pampa.db` if
/// this is the first time the project has been indexed or watched.
pub async fn start_watch(request: StartWatchRequest<'_>) -> Result<WatchHandle, PampaError> {
    crate::tracing_init::init_tracing();

    let db_path = project_db::db_path(request.repo_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| pampa_store::StoreError::Io { path: parent.display().to_string(), source: e })?;
    }
    let db = Arc::new(PampaDb::open_local(&db_path.to_string_lossy()).await?);

    let provider_name = request.provider.to_string();
    let provider_factory: pampa_watch::ProviderFactory = Box::new(move || pampa_embeddings::create_provider(&provider_name));

    let mut config = WatchConfig { encrypt: request.encrypt, on_batch: request.on_batch, ..WatchConfig::default() };
    if let Some(ms) = request.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }

    let inner = ProjectWatcher::start(PathBuf::from(request.repo_path), db, provider_factory, config)?;
    Ok(WatchHandle { ready: true, inner })
}
