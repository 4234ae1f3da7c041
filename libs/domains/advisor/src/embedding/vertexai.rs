//! Vertex AI text embedding provider (`publishers/google/models/<model>:predict`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingProvider;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{Document, EmbeddingTask};
use crate::vertex::{self, VertexAIConfig};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 768;

pub struct VertexAIProvider {
    client: Client,
    config: VertexAIConfig,
    model: String,
    dimension: u32,
}

impl VertexAIProvider {
    pub fn new(config: VertexAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_dimension(mut self, dimension: u32) -> Self {
        self.dimension = dimension;
        self
    }

    fn build_request(&self, text: &str, task: EmbeddingTask, title: Option<&str>) -> PredictRequest {
        PredictRequest {
            instances: vec![TextInstance {
                content: text.to_string(),
                task_type: task.as_str().to_string(),
                // Vertex only accepts a title for document embeddings
                title: match task {
                    EmbeddingTask::RetrievalDocument => title.map(str::to_string),
                    EmbeddingTask::RetrievalQuery => None,
                },
            }],
            parameters: Some(EmbeddingParameters {
                output_dimensionality: Some(self.dimension),
            }),
        }
    }

    async fn predict(
        &self,
        text: &str,
        task: EmbeddingTask,
        title: Option<&str>,
    ) -> AdvisorResult<Vec<f32>> {
        let access_token = vertex::access_token(&self.client, &self.config).await?;
        let endpoint = self.config.model_url(&self.model, "predict");
        let request = self.build_request(text, task, title);

        debug!(model = %self.model, %task, chars = text.len(), "Requesting embedding");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Embedding(format!(
                "Vertex AI API error ({}): {}",
                status, error_text
            )));
        }

        let body: PredictResponse = response.json().await?;
        let values = body
            .predictions
            .into_iter()
            .next()
            .map(|p| p.embeddings.values)
            .ok_or_else(|| AdvisorError::Embedding("No embedding returned".to_string()))?;

        if values.len() != self.dimension as usize {
            return Err(AdvisorError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                values.len()
            )));
        }

        Ok(values)
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<TextInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<EmbeddingParameters>,
}

#[derive(Debug, Serialize)]
struct TextInstance {
    content: String,
    task_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<EmbeddingPrediction>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingPrediction {
    embeddings: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for VertexAIProvider {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    async fn embed_document(&self, document: &Document) -> AdvisorResult<Vec<f32>> {
        self.predict(
            &document.content,
            EmbeddingTask::RetrievalDocument,
            Some(&document.metadata.title),
        )
        .await
    }

    async fn embed_query(&self, text: &str) -> AdvisorResult<Vec<f32>> {
        self.predict(text, EmbeddingTask::RetrievalQuery, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> VertexAIProvider {
        VertexAIProvider::new(VertexAIConfig::new("my-project", "us-central1")).with_dimension(256)
    }

    #[test]
    fn test_document_request_carries_title_and_task() {
        let request = provider().build_request(
            "Diwali sales peak",
            EmbeddingTask::RetrievalDocument,
            Some("Seasonality"),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "instances": [{
                    "content": "Diwali sales peak",
                    "task_type": "RETRIEVAL_DOCUMENT",
                    "title": "Seasonality"
                }],
                "parameters": { "outputDimensionality": 256 }
            })
        );
    }

    #[test]
    fn test_query_request_drops_title() {
        let request = provider().build_request("margins?", EmbeddingTask::RetrievalQuery, Some("x"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["instances"][0]["task_type"], "RETRIEVAL_QUERY");
        assert!(value["instances"][0].get("title").is_none());
    }

    #[test]
    fn test_prediction_parsing() {
        let body: PredictResponse = serde_json::from_value(json!({
            "predictions": [{
                "embeddings": { "values": [0.1, 0.2], "statistics": { "token_count": 3 } }
            }],
            "metadata": { "billableCharacterCount": 10 }
        }))
        .unwrap();
        assert_eq!(body.predictions[0].embeddings.values, vec![0.1, 0.2]);
    }
}
