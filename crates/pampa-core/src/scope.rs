//! Search scope: the filters and retrieval toggles a query runs under.
//!
//! A [`Scope`] is produced by merging context-pack defaults with
//! caller overrides (see `pampa-contextpack`) before a search runs.

use serde::{Deserialize, Serialize};

/// Reranking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Reranker {
    #[default]
    Off,
    Transformers,
}

/// Scope filters and retrieval toggles for a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub path_glob: Option<String>,
    pub tags: Vec<String>,
    pub lang: Vec<String>,
    pub provider: Option<String>,
    pub reranker: Reranker,
    pub hybrid: bool,
    pub bm25: bool,
    pub symbol_boost: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            path_glob: None,
            tags: Vec::new(),
            lang: Vec::new(),
            provider: None,
            reranker: Reranker::Off,
            hybrid: true,
            bm25: true,
            symbol_boost: true,
        }
    }
}

impl Scope {
    /// Merge `overrides` onto `self`, `Some`/non-empty fields in
    /// `overrides` taking precedence. Unknown keys are the caller's
    /// problem (this operates on the typed struct, not raw JSON).
    #[must_use]
    pub fn merged_with(mut self, overrides: &ScopeOverrides) -> Self {
        if let Some(ref glob) = overrides.path_glob {
            self.path_glob = Some(glob.clone());
        }
        if let Some(ref tags) = overrides.tags {
            self.tags = tags.clone();
        }
        if let Some(ref lang) = overrides.lang {
            self.lang = lang.clone();
        }
        if let Some(ref provider) = overrides.provider {
            self.provider = Some(provider.clone());
        }
        if let Some(reranker) = overrides.reranker {
            self.reranker = reranker;
        }
        if let Some(hybrid) = overrides.hybrid {
            self.hybrid = hybrid;
        }
        if let Some(bm25) = overrides.bm25 {
            self.bm25 = bm25;
        }
        if let Some(symbol_boost) = overrides.symbol_boost {
            self.symbol_boost = symbol_boost;
        }
        self
    }

    /// Does `file_path` match this scope's `path_glob` (if any)?
    #[must_use]
    pub fn path_matches(&self, file_path: &str) -> bool {
        let Some(ref glob) = self.path_glob else {
            return true;
        };
        globset::Glob::new(glob)
            .map(|g| g.compile_matcher().is_match(file_path))
            .unwrap_or(false)
    }

    /// Does `chunk_tags` intersect this scope's `tags` (case-insensitive)?
    #[must_use]
    pub fn tags_match(&self, chunk_tags: &[String]) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        let wanted: std::collections::HashSet<String> =
            self.tags.iter().map(|t| t.to_lowercase()).collect();
        chunk_tags.iter().any(|t| wanted.contains(&t.to_lowercase()))
    }

    /// Is `lang` among this scope's allowed languages (case-insensitive)?
    #[must_use]
    pub fn lang_matches(&self, lang: &str) -> bool {
        if self.lang.is_empty() {
            return true;
        }
        self.lang.iter().any(|l| l.eq_ignore_ascii_case(lang))
    }
}

/// Partial scope used for merging (context-pack defaults, caller
/// overrides, `MCP` `use_context_pack` session overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeOverrides {
    pub path_glob: Option<String>,
    pub tags: Option<Vec<String>>,
    pub lang: Option<Vec<String>>,
    pub provider: Option<String>,
    pub reranker: Option<Reranker>,
    pub hybrid: Option<bool>,
    pub bm25: Option<bool>,
    pub symbol_boost: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_match_everything() {
        let scope = Scope::default();
        assert!(scope.path_matches("src/anything.php"));
        assert!(scope.tags_match(&["anything".to_string()]));
        assert!(scope.lang_matches("php"));
    }

    #[test]
    fn path_glob_is_case_sensitive_and_dot_aware() {
        let mut scope = Scope::default();
        scope.path_glob = Some("src/**/*.php".to_string());
        assert!(scope.path_matches("src/a/b.php"));
        assert!(!scope.path_matches("src/a/b.PHP"));
    }

    #[test]
    fn tags_match_is_case_insensitive_intersection() {
        let mut scope = Scope::default();
        scope.tags = vec!["Stripe".to_string()];
        assert!(scope.tags_match(&["stripe".to_string(), "payment".to_string()]));
        assert!(!scope.tags_match(&["auth".to_string()]));
    }

    #[test]
    fn overrides_take_precedence() {
        let scope = Scope::default();
        let overrides = ScopeOverrides {
            hybrid: Some(false),
            ..Default::default()
        };
        let merged = scope.merged_with(&overrides);
        assert!(!merged.hybrid);
        assert!(merged.bm25, "untouched fields keep their prior value");
    }
}
