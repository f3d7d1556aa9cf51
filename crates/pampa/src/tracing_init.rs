//! Idempotent tracing-subscriber setup.
//!
//! `pampa` is a library with many possible entry points (direct calls,
//! an MCP server, a CLI, a watcher daemon), not one `main()` that could
//! call this once — so every public entry point calls it, and a
//! "subscriber already set" error from a second call is expected and
//! silently ignored rather than treated as a failure.

/// Install a `fmt` subscriber filtered by `PAMPA_LOG` (falling back to
/// `warn`), if one isn't already installed.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PAMPA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
