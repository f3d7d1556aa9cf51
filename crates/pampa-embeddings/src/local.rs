//! Local embedding generation via fastembed (ONNX runtime), no API key required.

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;
use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const DIMENSIONS: u32 = 384;
const TRUNCATION_CHARS: usize = 512;

fn cache_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".pampa").join("cache").join("fastembed")
}

/// Local MiniLM-L6-v2 embeddings, generated entirely on-device.
pub struct LocalProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalProvider {
    /// Load the local model, downloading it to the PAMPA cache dir on first run.
    pub fn init() -> Result<Self, EmbeddingError> {
        let opts = TextInitOptions::new(EmbeddingModel::AllMiniLML6V2).with_cache_dir(cache_dir());
        let model = TextEmbedding::try_new(opts).map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        Ok(Self { model: Arc::new(Mutex::new(model)) })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let truncated: Vec<String> = texts.iter().map(|t| self.truncate(t)).collect();
        let model = Arc::clone(&self.model);
        // fastembed is synchronous and uses its own thread pool internally;
        // run it off the async executor's worker threads.
        let result = tokio::task::spawn_blocking(move || {
            let mut model = model.lock().expect("fastembed model mutex poisoned");
            model.embed(truncated, None).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?;

        let vectors = result.map_err(EmbeddingError::EmbedFailed)?;
        if vectors.is_empty() {
            return Err(EmbeddingError::EmptyResult);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> u32 {
        DIMENSIONS
    }

    fn name(&self) -> &'static str {
        "local"
    }

    fn truncation_chars(&self) -> usize {
        TRUNCATION_CHARS
    }
}
