//! Application state management.
//!
//! The advisor's long-lived clients are built once here and shared by every
//! request through `Arc`.

use std::sync::Arc;

use domain_advisor::{
    AdvisorConfig, AdvisorService, ContextRetriever, KeyedRetriever, QdrantRepository,
    RetrievalPolicy, SimilarityRetriever, VertexAIProvider, VertexGeminiClient,
};
use tracing::info;

/// Shared application state (cheap to clone).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Chat pipeline with its retriever and generation client
    pub advisor: AdvisorService,
}

impl AppState {
    pub fn new(config: crate::config::Config) -> eyre::Result<Self> {
        let retriever = build_retriever(&config.advisor)?;
        let generator = Arc::new(
            VertexGeminiClient::new(config.advisor.vertex.clone())
                .with_model(&config.advisor.generation_model),
        );

        info!(
            policy = %config.advisor.retrieval_policy,
            model = %config.advisor.generation_model,
            "Advisor pipeline configured"
        );

        Ok(Self {
            advisor: AdvisorService::new(retriever, generator),
            config,
        })
    }
}

fn build_retriever(config: &AdvisorConfig) -> eyre::Result<Arc<dyn ContextRetriever>> {
    match config.retrieval_policy {
        RetrievalPolicy::Keyed => {
            info!(path = %config.business_records_path.display(), "Using keyed retrieval");
            Ok(Arc::new(KeyedRetriever::new(config.business_records_path.clone())))
        }
        RetrievalPolicy::Similarity => {
            info!(
                url = %config.qdrant.url,
                collection = %config.collection_name,
                "Using similarity retrieval"
            );
            let repository = QdrantRepository::new(config.qdrant.clone())?;
            let embedder = Arc::new(
                VertexAIProvider::new(config.vertex.clone())
                    .with_model(&config.embedding_model)
                    .with_dimension(config.embedding_dimension),
            );
            Ok(Arc::new(SimilarityRetriever::new(
                repository,
                embedder,
                &config.collection_name,
            )))
        }
    }
}
