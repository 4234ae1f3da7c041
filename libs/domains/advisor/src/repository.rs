use async_trait::async_trait;

use crate::error::AdvisorResult;
use crate::models::{SearchHit, VectorPoint};

/// Point store + nearest-neighbour search over one named collection at a time.
///
/// Abstracts the vector database (Qdrant) so ingestion and retrieval can be
/// tested without one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    async fn collection_exists(&self, collection: &str) -> AdvisorResult<bool>;

    /// Create a cosine-distance collection of the given vector size
    async fn create_collection(&self, collection: &str, dimension: u32) -> AdvisorResult<()>;

    async fn delete_collection(&self, collection: &str) -> AdvisorResult<()>;

    /// Insert or overwrite the point with `point.id`
    async fn upsert(&self, collection: &str, point: VectorPoint) -> AdvisorResult<()>;

    /// Up to `limit` nearest points, best first, no score threshold
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> AdvisorResult<Vec<SearchHit>>;

    /// Exact number of points in the collection
    async fn count(&self, collection: &str) -> AdvisorResult<u64>;

    async fn health_check(&self) -> AdvisorResult<()>;
}
