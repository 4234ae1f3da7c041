//! Shared Vertex AI plumbing: project/location config, endpoint URLs and
//! access tokens. Used by both the embedding and the generation clients.
//!
//! Tokens come from `GOOGLE_ACCESS_TOKEN` when set, otherwise from the GCE
//! metadata server (Cloud Run, GKE Workload Identity).

use core_config::{ConfigError, FromEnv, env_or_default};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AdvisorError, AdvisorResult};

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Vertex AI project configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAIConfig {
    /// GCP Project ID
    pub project_id: String,
    /// GCP Region (e.g., "us-central1") or "global"
    pub location: String,
    /// Static bearer token; when absent the metadata server is asked
    pub access_token: Option<String>,
}

impl VertexAIConfig {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn host(&self) -> String {
        if self.location == "global" {
            "aiplatform.googleapis.com".to_string()
        } else {
            format!("{}-aiplatform.googleapis.com", self.location)
        }
    }

    /// `https://<host>/v1/projects/<p>/locations/<l>/publishers/google/models/<model>:<method>`
    pub fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "https://{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.host(),
            self.project_id,
            self.location,
            model,
            method
        )
    }
}

impl FromEnv for VertexAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_id = std::env::var("GOOGLE_CLOUD_PROJECT")
            .or_else(|_| std::env::var("GCP_PROJECT_ID"))
            .map_err(|_| ConfigError::MissingEnvVar("GOOGLE_CLOUD_PROJECT".to_string()))?;

        let location = env_or_default("VERTEX_AI_LOCATION", "us-central1");
        let access_token = std::env::var("GOOGLE_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            project_id,
            location,
            access_token,
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Resolve a bearer token for Vertex AI calls.
pub(crate) async fn access_token(client: &Client, config: &VertexAIConfig) -> AdvisorResult<String> {
    if let Some(ref token) = config.access_token {
        return Ok(token.clone());
    }

    let response = client
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| {
            AdvisorError::Config(format!(
                "Failed to get access token from metadata server: {}. \
                 Set GOOGLE_ACCESS_TOKEN for local development.",
                e
            ))
        })?;

    if !response.status().is_success() {
        return Err(AdvisorError::Config(format!(
            "Metadata server refused token request ({}). \
             Set GOOGLE_ACCESS_TOKEN for local development.",
            response.status()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AdvisorError::Config(format!("Failed to parse token response: {}", e)))?;

    Ok(token.access_token)
}
