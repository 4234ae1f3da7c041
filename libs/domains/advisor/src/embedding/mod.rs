mod provider;
mod vertexai;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
pub use provider::EmbeddingProvider;
pub use vertexai::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL, VertexAIProvider};
