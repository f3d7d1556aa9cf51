//! Provider factory: resolve a provider name to a concrete [`EmbeddingProvider`].

use crate::error::EmbeddingError;
use crate::local::LocalProvider;
use crate::provider::EmbeddingProvider;
use crate::stubs::{CohereProvider, OllamaProvider, OpenAiProvider};

/// Select a provider by name. `"auto"` prefers OpenAI, then Cohere, then
/// falls back to the local model, based on which API key env vars are set.
pub fn create_provider(name: &str) -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    match name {
        "openai" => Ok(Box::new(OpenAiProvider)),
        "transformers" | "local" => Ok(Box::new(LocalProvider::init()?)),
        "ollama" => Ok(Box::new(OllamaProvider)),
        "cohere" => Ok(Box::new(CohereProvider)),
        "auto" => create_auto_provider(),
        other => Err(EmbeddingError::UnknownProvider(other.to_string())),
    }
}

fn create_auto_provider() -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        return create_provider("openai");
    }
    if std::env::var("COHERE_API_KEY").is_ok() {
        return create_provider("cohere");
    }
    create_provider("local")
}
