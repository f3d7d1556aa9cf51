//! Process-wide defaults layered with `PAMPA_`-prefixed environment
//! variables. Per-call overrides (provider name, debounce, scope) still
//! win over this — `PampaConfig` only supplies what a caller omitted.
//!
//! `pampa-store::key::MasterKey` and `pampa-embeddings::factory` read
//! their own env vars (`PAMPA_ENCRYPTION_KEY`, `OPENAI_API_KEY`, ...)
//! directly; this config layer doesn't re-read or re-validate those,
//! it only owns the handful of knobs that have no more specific home.

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::error::PampaError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PampaConfig {
    /// Provider name used when a caller doesn't pass one explicitly.
    pub default_provider: String,
    /// Watcher debounce window, milliseconds. Clamped to the watcher's
    /// own minimum regardless of what's configured here.
    pub debounce_ms: u64,
}

impl Default for PampaConfig {
    fn default() -> Self {
        Self { default_provider: "auto".to_string(), debounce_ms: 500 }
    }
}

impl PampaConfig {
    /// Load defaults merged with `PAMPA_`-prefixed environment
    /// variables (`PAMPA_DEFAULT_PROVIDER`, `PAMPA_DEBOUNCE_MS`).
    pub fn load() -> Result<Self, PampaError> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("PAMPA_").split("__"))
            .extract()
            .map_err(PampaError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_any_environment() {
        Jail::expect_with(|_jail| {
            let config = PampaConfig::load().unwrap();
            assert_eq!(config.default_provider, "auto");
            assert_eq!(config.debounce_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn env_var_overrides_default_provider() {
        Jail::expect_with(|jail| {
            jail.set_env("PAMPA_DEFAULT_PROVIDER", "openai");
            let config = PampaConfig::load().unwrap();
            assert_eq!(config.default_provider, "openai");
            Ok(())
        });
    }

    #[test]
    fn env_var_overrides_debounce() {
        Jail::expect_with(|jail| {
            jail.set_env("PAMPA_DEBOUNCE_MS", "750");
            let config = PampaConfig::load().unwrap();
            assert_eq!(config.debounce_ms, 750);
            Ok(())
        });
    }

    #[test]
    fn typo_env_var_is_silently_ignored() {
        Jail::expect_with(|jail| {
            jail.set_env("PAMPA_DEFAULT_PROVIDR", "openai");
            let config = PampaConfig::load().unwrap();
            assert_eq!(config.default_provider, "auto");
            Ok(())
        });
    }
}
