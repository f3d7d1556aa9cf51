//! Parser error types for pampa-parser.

/// Errors that can occur during source code parsing and extraction.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("parse failed for {language}: {message}")]
    ParseFailed { language: String, message: String },

    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    /// Even the whole-file fallback chunk failed (e.g. non-UTF8 content).
    #[error("fallback chunk failed for {0}")]
    FallbackFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
