//! Gemini on Vertex AI (`publishers/google/models/<model>:generateContent`).
//!
//! Sends the prompt as a single user turn with no generation config, so the
//! model's defaults apply.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GenerationClient;
use crate::error::{AdvisorError, AdvisorResult};
use crate::vertex::{self, VertexAIConfig};

pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash-lite";

pub struct VertexGeminiClient {
    client: Client,
    config: VertexAIConfig,
    model: String,
}

impl VertexGeminiClient {
    pub fn new(config: VertexAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            model: DEFAULT_GENERATION_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn user_turn(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenated text of the first candidate, trimmed. Blank counts as no answer.
fn extract_text(response: GenerateContentResponse) -> AdvisorResult<String> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AdvisorError::Generation(
            "Gemini returned no text in the response candidates".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

fn map_http_error(status: StatusCode, body: &str) -> AdvisorError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string());

    AdvisorError::Generation(format!("Vertex AI returned {}: {}", status.as_u16(), message))
}

#[async_trait]
impl GenerationClient for VertexGeminiClient {
    async fn generate(&self, prompt: &str) -> AdvisorResult<String> {
        let access_token = vertex::access_token(&self.client, &self.config)
            .await
            .map_err(|e| AdvisorError::Generation(e.to_string()))?;
        let endpoint = self.config.model_url(&self.model, "generateContent");

        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(access_token)
            .json(&GenerateContentRequest::user_turn(prompt))
            .send()
            .await
            .map_err(|e| AdvisorError::Generation(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdvisorError::Generation(format!("Failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::Generation(format!("Failed to parse Gemini response: {e}")))?;

        extract_text(parsed)
    }
}
