//! The uniform embedding provider contract.

use crate::error::EmbeddingError;
use async_trait::async_trait;

/// A provider capable of turning text into fixed-dimension vectors.
///
/// Every chunk stored under a given provider uses the same
/// `dimensions()`; search only ever compares vectors produced by the
/// same `(name, dimensions)` pair.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, truncating each to this provider's
    /// character budget before calling out.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Output vector length.
    fn dimensions(&self) -> u32;

    /// Stable provider identifier stored alongside each chunk's embedding.
    fn name(&self) -> &'static str;

    /// Character budget applied to input text before embedding.
    fn truncation_chars(&self) -> usize;

    /// Truncate `text` to this provider's character budget.
    fn truncate(&self, text: &str) -> String {
        text.chars().take(self.truncation_chars()).collect()
    }
}
