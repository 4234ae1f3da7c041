use async_trait::async_trait;

use crate::error::AdvisorResult;
use crate::models::Document;

/// Text -> vector. The model itself is a black box.
///
/// Documents and queries are embedded with different task types so the
/// hosted model can optimise each side of the similarity search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Vector size produced by this provider
    fn dimension(&self) -> u32;

    /// Embed a corpus document for storage
    async fn embed_document(&self, document: &Document) -> AdvisorResult<Vec<f32>>;

    /// Embed a user query for search
    async fn embed_query(&self, text: &str) -> AdvisorResult<Vec<f32>>;
}
