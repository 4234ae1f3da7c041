//! Context retrieval policies.
//!
//! "Nothing relevant" is never an error: both retrievers answer with
//! [`RetrievedContext::Empty`] and the request carries on.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::corpus::load_business_records;
use crate::embedding::EmbeddingProvider;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::RetrievedContext;
use crate::repository::VectorRepository;

/// Number of nearest documents fetched per query
pub const SIMILARITY_TOP_K: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalQuery {
    pub query: String,
    pub business: Option<String>,
}

impl RetrievalQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            business: None,
        }
    }

    pub fn for_business(mut self, business: impl Into<String>) -> Self {
        self.business = Some(business.into());
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve(&self, query: &RetrievalQuery) -> AdvisorResult<RetrievedContext>;

    /// Readiness of the backing source
    async fn check_ready(&self) -> AdvisorResult<()>;
}

/// Which retriever the API wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalPolicy {
    /// Exact lookup of the request's business key
    #[default]
    Keyed,
    /// Nearest-neighbour search over the embedded corpus
    Similarity,
}

impl RetrievalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalPolicy::Keyed => "keyed",
            RetrievalPolicy::Similarity => "similarity",
        }
    }
}

impl fmt::Display for RetrievalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyed" => Ok(RetrievalPolicy::Keyed),
            "similarity" => Ok(RetrievalPolicy::Similarity),
            other => Err(format!(
                "unknown retrieval policy '{}', expected 'keyed' or 'similarity'",
                other
            )),
        }
    }
}

// ===== Similarity =====

pub struct SimilarityRetriever<R: VectorRepository> {
    repository: R,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl<R: VectorRepository> SimilarityRetriever<R> {
    pub fn new(
        repository: R,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            embedder,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl<R: VectorRepository> ContextRetriever for SimilarityRetriever<R> {
    #[instrument(skip(self, query), fields(collection = %self.collection))]
    async fn retrieve(&self, query: &RetrievalQuery) -> AdvisorResult<RetrievedContext> {
        // Nothing ingested yet
        let exists = self
            .repository
            .collection_exists(&self.collection)
            .await
            .map_err(|e| AdvisorError::Retrieval(e.to_string()))?;
        if !exists {
            debug!("Collection not created yet");
            return Ok(RetrievedContext::Empty);
        }

        let vector = self
            .embedder
            .embed_query(&query.query)
            .await
            .map_err(|e| AdvisorError::Retrieval(e.to_string()))?;

        let hits = self
            .repository
            .search(&self.collection, vector, SIMILARITY_TOP_K)
            .await
            .map_err(|e| AdvisorError::Retrieval(e.to_string()))?;

        debug!(hits = hits.len(), "Similarity search complete");

        if hits.is_empty() {
            return Ok(RetrievedContext::Empty);
        }

        Ok(RetrievedContext::Snippets(
            hits.into_iter().map(|hit| hit.content).collect(),
        ))
    }

    async fn check_ready(&self) -> AdvisorResult<()> {
        self.repository.health_check().await
    }
}

// ===== Keyed =====

pub struct KeyedRetriever {
    path: PathBuf,
}

impl KeyedRetriever {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContextRetriever for KeyedRetriever {
    #[instrument(skip(self, query), fields(business = ?query.business))]
    async fn retrieve(&self, query: &RetrievalQuery) -> AdvisorResult<RetrievedContext> {
        let Some(business) = query.business.as_deref() else {
            debug!("No business key on request");
            return Ok(RetrievedContext::Empty);
        };

        let mut directory = load_business_records(&self.path).await?;

        match directory.remove(business) {
            Some(record) => Ok(RetrievedContext::Record(record)),
            None => {
                debug!("Unknown business key");
                Ok(RetrievedContext::Empty)
            }
        }
    }

    async fn check_ready(&self) -> AdvisorResult<()> {
        load_business_records(&self.path).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::models::SearchHit;
    use crate::repository::MockVectorRepository;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn hit(n: usize) -> SearchHit {
        SearchHit {
            doc_id: format!("doc_{n}"),
            title: format!("Title {n}"),
            content: format!("Content {n}"),
            score: 1.0 - n as f32 * 0.1,
        }
    }

    fn embedder() -> Arc<dyn EmbeddingProvider> {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_query()
            .returning(|_| Ok(vec![0.1, 0.2, 0.3]));
        Arc::new(embedder)
    }

    fn existing_collection() -> MockVectorRepository {
        let mut repo = MockVectorRepository::new();
        repo.expect_collection_exists()
            .withf(|collection| collection == "biz_docs")
            .returning(|_| Ok(true));
        repo
    }

    /// Mimics the store: returns at most `limit` of the `stored` hits.
    fn repository_with(stored: usize) -> MockVectorRepository {
        let mut repo = existing_collection();
        repo.expect_search()
            .withf(|collection, _, limit| collection == "biz_docs" && *limit == SIMILARITY_TOP_K)
            .returning(move |_, _, limit| Ok((0..stored.min(limit as usize)).map(hit).collect()));
        repo
    }

    #[tokio::test]
    async fn test_similarity_returns_at_most_top_k() {
        let retriever = SimilarityRetriever::new(repository_with(10), embedder(), "biz_docs");

        let ctx = retriever
            .retrieve(&RetrievalQuery::new("improve margins"))
            .await
            .unwrap();

        assert_eq!(
            ctx,
            RetrievedContext::Snippets(vec![
                "Content 0".into(),
                "Content 1".into(),
                "Content 2".into()
            ])
        );
        assert_eq!(ctx.render(), "Content 0\nContent 1\nContent 2");
    }

    #[tokio::test]
    async fn test_similarity_returns_fewer_when_collection_is_small() {
        let retriever = SimilarityRetriever::new(repository_with(2), embedder(), "biz_docs");

        let ctx = retriever.retrieve(&RetrievalQuery::new("q")).await.unwrap();
        assert_eq!(
            ctx,
            RetrievedContext::Snippets(vec!["Content 0".into(), "Content 1".into()])
        );
    }

    #[tokio::test]
    async fn test_similarity_no_matches_is_empty() {
        let retriever = SimilarityRetriever::new(repository_with(0), embedder(), "biz_docs");

        let ctx = retriever.retrieve(&RetrievalQuery::new("q")).await.unwrap();
        assert_eq!(ctx, RetrievedContext::Empty);
    }

    #[tokio::test]
    async fn test_similarity_uses_query_embedding() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_query()
            .withf(|text| text == "festive stock")
            .times(1)
            .returning(|_| Ok(vec![0.5; 3]));

        let mut repo = existing_collection();
        repo.expect_search()
            .withf(|_, vector, _| vector == &vec![0.5; 3])
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let retriever = SimilarityRetriever::new(repo, Arc::new(embedder), "biz_docs");
        retriever
            .retrieve(&RetrievalQuery::new("festive stock"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_similarity_before_ingestion_is_empty() {
        let mut repo = MockVectorRepository::new();
        repo.expect_collection_exists().times(1).returning(|_| Ok(false));
        repo.expect_search().never();

        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed_query().never();

        let retriever = SimilarityRetriever::new(repo, Arc::new(embedder), "biz_docs");
        let ctx = retriever.retrieve(&RetrievalQuery::new("q")).await.unwrap();
        assert_eq!(ctx, RetrievedContext::Empty);
    }

    #[tokio::test]
    async fn test_similarity_unreachable_store_is_retrieval_error() {
        let mut repo = MockVectorRepository::new();
        repo.expect_collection_exists()
            .returning(|_| Err(AdvisorError::VectorStore("connection refused".into())));

        let retriever = SimilarityRetriever::new(repo, embedder(), "biz_docs");
        assert!(matches!(
            retriever.retrieve(&RetrievalQuery::new("q")).await,
            Err(AdvisorError::Retrieval(_))
        ));
    }

    #[tokio::test]
    async fn test_similarity_store_failure_is_retrieval_error() {
        let mut repo = existing_collection();
        repo.expect_search()
            .returning(|_, _, _| Err(AdvisorError::VectorStore("connection refused".into())));

        let retriever = SimilarityRetriever::new(repo, embedder(), "biz_docs");
        let err = retriever.retrieve(&RetrievalQuery::new("q")).await.unwrap_err();

        assert!(matches!(err, AdvisorError::Retrieval(ref msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_similarity_embedding_failure_is_retrieval_error() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_query()
            .returning(|_| Err(AdvisorError::Embedding("403".into())));

        let retriever =
            SimilarityRetriever::new(existing_collection(), Arc::new(embedder), "biz_docs");
        assert!(matches!(
            retriever.retrieve(&RetrievalQuery::new("q")).await,
            Err(AdvisorError::Retrieval(_))
        ));
    }

    fn records_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "sarah": {
                    "name": "Sarah's Restaurant",
                    "type": "Restaurant",
                    "region": "Pune",
                    "context": "Family dining, 12 staff",
                    "monthlyData": {"2024": {"07": {"revenue": 32000, "expenses": 28000, "profit": 4000}}}
                }
            }"#,
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_keyed_known_key_returns_stored_record() {
        let file = records_file();
        let retriever = KeyedRetriever::new(file.path());

        let ctx = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("sarah"))
            .await
            .unwrap();

        let expected = load_business_records(file.path()).await.unwrap()["sarah"].clone();
        assert_eq!(ctx, RetrievedContext::Record(expected));
    }

    #[tokio::test]
    async fn test_keyed_record_keeps_stored_numbers() {
        let file = records_file();
        let retriever = KeyedRetriever::new(file.path());

        let rendered = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("sarah"))
            .await
            .unwrap()
            .render();

        assert!(rendered.contains("\"revenue\": 32000,"));
        assert!(rendered.starts_with("{\n  \"name\": \"Sarah's Restaurant\",\n  \"type\": \"Restaurant\""));
    }

    #[tokio::test]
    async fn test_keyed_lookup_survives_malformed_neighbour() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "sarah": {"name": "Sarah's Restaurant", "monthlyData": {"2025": {"07": {"revenue": 32000}}}},
                "lisa": {"name": "Lisa's Retail Store", "monthlyData": {"2025": {"07": {"revenue": "12k"}}}}
            }"#,
        )
        .unwrap();
        let retriever = KeyedRetriever::new(file.path());

        let sarah = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("sarah"))
            .await
            .unwrap();
        assert!(sarah.render().contains("\"revenue\": 32000"));

        let lisa = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("lisa"))
            .await
            .unwrap();
        assert!(lisa.render().contains("\"revenue\": \"12k\""));
    }

    #[tokio::test]
    async fn test_keyed_unknown_key_is_empty() {
        let file = records_file();
        let retriever = KeyedRetriever::new(file.path());

        let ctx = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("nobody"))
            .await
            .unwrap();
        assert_eq!(ctx, RetrievedContext::Empty);
    }

    #[tokio::test]
    async fn test_keyed_without_business_is_empty_and_skips_file() {
        let retriever = KeyedRetriever::new("/no/such/file.json");
        let ctx = retriever.retrieve(&RetrievalQuery::new("q")).await.unwrap();
        assert_eq!(ctx, RetrievedContext::Empty);
    }

    #[tokio::test]
    async fn test_keyed_unreadable_file_is_load_error() {
        let retriever = KeyedRetriever::new("/no/such/file.json");
        let err = retriever
            .retrieve(&RetrievalQuery::new("q").for_business("sarah"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Load { .. }));
        assert!(retriever.check_ready().await.is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("keyed".parse::<RetrievalPolicy>(), Ok(RetrievalPolicy::Keyed));
        assert_eq!(
            " Similarity ".parse::<RetrievalPolicy>(),
            Ok(RetrievalPolicy::Similarity)
        );
        assert!("vector".parse::<RetrievalPolicy>().is_err());
        assert_eq!(RetrievalPolicy::default(), RetrievalPolicy::Keyed);
    }
}
