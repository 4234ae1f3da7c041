use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder, value::Kind,
};

use super::QdrantConfig;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{SearchHit, VectorPoint};
use crate::repository::VectorRepository;

const DOC_ID_KEY: &str = "doc_id";
const TITLE_KEY: &str = "title";
const CONTENT_KEY: &str = "content";

/// Qdrant-backed implementation of VectorRepository
pub struct QdrantRepository {
    client: Qdrant,
}

impl QdrantRepository {
    pub fn new(config: QdrantConfig) -> AdvisorResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        let client = builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::VectorStore(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    fn point_payload(point: &VectorPoint) -> HashMap<String, QdrantValue> {
        HashMap::from([
            (DOC_ID_KEY.to_string(), QdrantValue::from(point.doc_id.clone())),
            (TITLE_KEY.to_string(), QdrantValue::from(point.title.clone())),
            (CONTENT_KEY.to_string(), QdrantValue::from(point.content.clone())),
        ])
    }
}

fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<String> {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn collection_exists(&self, collection: &str) -> AdvisorResult<bool> {
        Ok(self.client.collection_exists(collection).await?)
    }

    async fn create_collection(&self, collection: &str, dimension: u32) -> AdvisorResult<()> {
        let builder = CreateCollectionBuilder::new(collection).vectors_config(
            VectorParamsBuilder::new(dimension as u64, Distance::Cosine),
        );
        self.client.create_collection(builder).await?;
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> AdvisorResult<()> {
        self.client.delete_collection(collection).await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, point: VectorPoint) -> AdvisorResult<()> {
        let payload = Self::point_payload(&point);
        let point = PointStruct::new(point.id.to_string(), point.values, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]).wait(true))
            .await?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> AdvisorResult<Vec<SearchHit>> {
        let builder = SearchPointsBuilder::new(collection, vector, limit).with_payload(true);
        let response = self.client.search_points(builder).await?;

        response
            .result
            .into_iter()
            .map(|point| {
                let content = payload_string(&point.payload, CONTENT_KEY).ok_or_else(|| {
                    AdvisorError::VectorStore(format!(
                        "Point in {} has no '{}' payload",
                        collection, CONTENT_KEY
                    ))
                })?;

                Ok(SearchHit {
                    doc_id: payload_string(&point.payload, DOC_ID_KEY).unwrap_or_default(),
                    title: payload_string(&point.payload, TITLE_KEY).unwrap_or_default(),
                    content,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn count(&self, collection: &str) -> AdvisorResult<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn health_check(&self) -> AdvisorResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
