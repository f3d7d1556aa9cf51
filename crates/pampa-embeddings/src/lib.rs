//! Embedding provider abstraction: a uniform `init/embed/dimensions/name`
//! contract over local (fastembed) and remote (OpenAI, Ollama, Cohere)
//! embedding backends, selected by name via [`create_provider`].

pub mod error;
pub mod factory;
pub mod input;
pub mod local;
pub mod provider;
pub mod stubs;

pub use error::EmbeddingError;
pub use factory::create_provider;
pub use input::{EmbeddingInputFields, build_embedding_input};
pub use local::LocalProvider;
pub use provider::EmbeddingProvider;
pub use stubs::{CohereProvider, OllamaProvider, OpenAiProvider};
