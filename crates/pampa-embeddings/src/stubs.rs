//! Thin stubs for the remote provider SDKs.
//!
//! Concrete OpenAI/Ollama/Cohere integrations are outside this crate's
//! scope; these structs hold the uniform contract's metadata
//! (`name`, `dimensions`, `truncation_chars`) so callers can resolve a
//! `(provider, dimensions)` pair and fail clearly on `embed`.

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;
use async_trait::async_trait;

macro_rules! remote_stub {
    ($struct_name:ident, $name:literal, $dimensions:expr, $truncation:expr) => {
        #[doc = concat!("Uniform-contract metadata for the `", $name, "` provider.")]
        pub struct $struct_name;

        #[async_trait]
        impl EmbeddingProvider for $struct_name {
            async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
                Err(EmbeddingError::NotImplemented($name.to_string()))
            }

            fn dimensions(&self) -> u32 {
                $dimensions
            }

            fn name(&self) -> &'static str {
                $name
            }

            fn truncation_chars(&self) -> usize {
                $truncation
            }
        }
    };
}

remote_stub!(OpenAiProvider, "openai", 3072, 8192);
remote_stub!(OllamaProvider, "ollama", 768, 2048);
remote_stub!(CohereProvider, "cohere", 1024, 4096);
