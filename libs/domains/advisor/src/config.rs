use std::path::PathBuf;

use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};

use crate::embedding::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};
use crate::generation::DEFAULT_GENERATION_MODEL;
use crate::qdrant::QdrantConfig;
use crate::retrieval::RetrievalPolicy;
use crate::vertex::VertexAIConfig;

pub const DEFAULT_COLLECTION_NAME: &str = "biz_docs";
pub const DEFAULT_DOCUMENTS_PATH: &str = "data/business_data.json";
pub const DEFAULT_BUSINESS_RECORDS_PATH: &str = "data/business_profiles.json";

/// Everything the advisor pipeline needs to wire its clients.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub vertex: VertexAIConfig,
    pub qdrant: QdrantConfig,
    pub generation_model: String,
    pub embedding_model: String,
    pub embedding_dimension: u32,
    pub documents_path: PathBuf,
    pub business_records_path: PathBuf,
    pub collection_name: String,
    pub retrieval_policy: RetrievalPolicy,
}

impl FromEnv for AdvisorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            vertex: VertexAIConfig::from_env()?,
            qdrant: QdrantConfig::from_env()?,
            generation_model: env_or_default("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
            embedding_model: env_or_default("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_dimension: env_parse_or("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION)?,
            documents_path: env_or_default("DOCUMENTS_PATH", DEFAULT_DOCUMENTS_PATH).into(),
            business_records_path: env_or_default(
                "BUSINESS_RECORDS_PATH",
                DEFAULT_BUSINESS_RECORDS_PATH,
            )
            .into(),
            collection_name: env_or_default("COLLECTION_NAME", DEFAULT_COLLECTION_NAME),
            retrieval_policy: env_parse_or("RETRIEVAL_POLICY", RetrievalPolicy::default())?,
        })
    }
}
