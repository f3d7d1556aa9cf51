//! Supported source languages and extension detection.

use serde::{Deserialize, Serialize};

/// A language PAMPA knows how to chunk and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Php,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Java,
}

impl Language {
    /// Detect a language from a file path by its (lowercased) extension.
    /// Returns `None` for unsupported extensions — such files are skipped
    /// by the extractor entirely.
    #[must_use]
    pub fn from_path(file_path: &str) -> Option<Self> {
        let ext = file_path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "php" => Some(Self::Php),
            "py" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Stable lowercase name, as stored in the codemap and embedding store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Go => "go",
            Self::Java => "java",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
