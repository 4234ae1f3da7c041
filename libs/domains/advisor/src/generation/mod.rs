mod client;
mod gemini;

#[cfg(test)]
pub use client::MockGenerationClient;
pub use client::GenerationClient;
pub use gemini::{DEFAULT_GENERATION_MODEL, VertexGeminiClient};
