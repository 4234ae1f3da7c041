//! Advisor Domain Library
//!
//! Retrieval-augmented business advice: a question and a business profile go
//! in, context is looked up, a prompt is assembled and a hosted Gemini model
//! answers it.
//!
//! # Architecture
//!
//! ```text
//! POST /chat ──► AdvisorService (ChatStage state machine)
//!                   │
//!        ┌──────────┴───────────┐
//!        ▼                      ▼
//! ┌─────────────────┐   ┌──────────────────┐
//! │ ContextRetriever│   │ GenerationClient │
//! │    (trait)      │   │     (trait)      │
//! └───────┬─────────┘   └────────┬─────────┘
//!    ┌────┴──────────────┐       │
//!    ▼                   ▼       ▼
//! KeyedRetriever  SimilarityRetriever   VertexGeminiClient
//! (business JSON)   │          │
//!                   ▼          ▼
//!        VectorRepository  EmbeddingProvider
//!        (QdrantRepository) (VertexAIProvider)
//! ```
//!
//! The same `VectorRepository` + `EmbeddingProvider` pair backs
//! [`IngestionJob`], which loads the document corpus into the collection.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_advisor::{
//!     AdvisorService, ChatRequest, KeyedRetriever, VertexAIConfig, VertexGeminiClient,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vertex = VertexAIConfig::new("my-project", "global");
//! let service = AdvisorService::new(
//!     Arc::new(KeyedRetriever::new("data/business_profiles.json")),
//!     Arc::new(VertexGeminiClient::new(vertex)),
//! );
//!
//! let request = ChatRequest {
//!     query: Some("How can I improve my margins?".into()),
//!     business: Some("sarah".into()),
//!     profile: None,
//! };
//! let response = service.chat(request).await?;
//! println!("{}", response.answer.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod ingestion;
pub mod models;
pub mod prompt;
pub mod qdrant;
pub mod repository;
pub mod retrieval;
pub mod service;
pub mod vertex;

pub use config::AdvisorConfig;
pub use corpus::{load_business_records, load_documents};
pub use embedding::{EmbeddingProvider, VertexAIProvider};
pub use error::{AdvisorError, AdvisorResult};
pub use generation::{GenerationClient, VertexGeminiClient};
pub use handlers::{ApiDoc, router};
pub use ingestion::{IngestionJob, IngestionMode, IngestionReport};
pub use models::*;
pub use prompt::build_prompt;
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::VectorRepository;
pub use retrieval::{
    ContextRetriever, KeyedRetriever, RetrievalPolicy, RetrievalQuery, SIMILARITY_TOP_K,
    SimilarityRetriever,
};
pub use service::{AdvisorService, ChatFailure, ChatStage};
pub use vertex::VertexAIConfig;
