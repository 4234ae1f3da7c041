use std::fmt;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum_helpers::error_response_with_details;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::AdvisorError;
use crate::generation::GenerationClient;
use crate::models::{ChatRequest, ChatResponse};
use crate::prompt::build_prompt;
use crate::retrieval::{ContextRetriever, RetrievalQuery};

/// Progress of a single chat request. `Errored` can follow any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStage {
    Received,
    ProfileResolved,
    ContextRetrieved,
    PromptBuilt,
    GenerationComplete,
    Responded,
    Errored,
}

impl ChatStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStage::Received => "received",
            ChatStage::ProfileResolved => "profile_resolved",
            ChatStage::ContextRetrieved => "context_retrieved",
            ChatStage::PromptBuilt => "prompt_built",
            ChatStage::GenerationComplete => "generation_complete",
            ChatStage::Responded => "responded",
            ChatStage::Errored => "errored",
        }
    }
}

impl fmt::Display for ChatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that ended in [`ChatStage::Errored`].
///
/// `stage` is the last stage reached before the failing step.
#[derive(Debug)]
pub struct ChatFailure {
    pub stage: ChatStage,
    pub error: AdvisorError,
}

impl fmt::Display for ChatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {})", self.error, self.stage)
    }
}

impl std::error::Error for ChatFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for ChatFailure {
    fn into_response(self) -> Response {
        let (status, code) = self.error.status_and_code();
        error_response_with_details(
            status,
            self.error.to_string(),
            code,
            json!({
                "stage": self.stage,
                "state": ChatStage::Errored,
            }),
        )
    }
}

/// Runs the chat pipeline: profile, context, prompt, generation.
///
/// Clients are built once and shared; the service itself holds no
/// per-request state.
#[derive(Clone)]
pub struct AdvisorService {
    retriever: Arc<dyn ContextRetriever>,
    generator: Arc<dyn GenerationClient>,
}

impl AdvisorService {
    pub fn new(retriever: Arc<dyn ContextRetriever>, generator: Arc<dyn GenerationClient>) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Readiness of the configured context source
    pub async fn check_ready(&self) -> Result<(), AdvisorError> {
        self.retriever.check_ready().await
    }

    #[instrument(skip(self, request), fields(business = ?request.business))]
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatFailure> {
        let mut stage = ChatStage::Received;
        debug!(%stage, "Chat request received");

        let fail = |stage: ChatStage, error: AdvisorError| {
            warn!(%stage, error = %error, "Chat request errored");
            ChatFailure { stage, error }
        };

        request
            .validate()
            .map_err(|e| fail(stage, AdvisorError::Validation(e.to_string())))?;
        let query = match request.query {
            Some(query) => query,
            None => {
                return Err(fail(
                    stage,
                    AdvisorError::Validation("query is required".into()),
                ));
            }
        };

        let profile = request.profile.unwrap_or_default();
        stage = ChatStage::ProfileResolved;
        debug!(%stage, industry = %profile.industry, profile_stage = %profile.stage, "Profile resolved");

        let retrieval = RetrievalQuery {
            query: query.clone(),
            business: request.business,
        };
        let context = self
            .retriever
            .retrieve(&retrieval)
            .await
            .map_err(|e| fail(stage, e))?;
        stage = ChatStage::ContextRetrieved;
        debug!(%stage, context = context.kind(), "Context retrieved");

        let prompt = build_prompt(&profile, &context, &query);
        stage = ChatStage::PromptBuilt;
        debug!(%stage, prompt_chars = prompt.len(), "Prompt built");

        let text = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| fail(stage, e))?;
        stage = ChatStage::GenerationComplete;
        debug!(%stage, "Generation complete");

        let response = ChatResponse::new(text);
        stage = ChatStage::Responded;
        info!(%stage, context_found = !context.is_empty(), "Chat request answered");

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGenerationClient;
    use crate::models::{BusinessRecord, RetrievedContext};
    use crate::retrieval::MockContextRetriever;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    fn sarah() -> BusinessRecord {
        BusinessRecord::new(json!({
            "name": "Sarah's Restaurant",
            "type": "Restaurant",
            "region": "Pune",
            "context": "Family dining",
            "employees": 12,
        }))
    }

    fn request(query: Option<&str>, business: Option<&str>) -> ChatRequest {
        ChatRequest {
            query: query.map(String::from),
            business: business.map(String::from),
            profile: None,
        }
    }

    #[tokio::test]
    async fn test_known_business_record_reaches_prompt() {
        let mut retriever = MockContextRetriever::new();
        retriever
            .expect_retrieve()
            .withf(|q| q.business.as_deref() == Some("sarah") && q.query == "How do I cut costs?")
            .times(1)
            .returning(|_| Ok(RetrievedContext::Record(sarah())));

        let rendered = serde_json::to_string_pretty(&sarah()).unwrap();
        let mut generator = MockGenerationClient::new();
        generator
            .expect_generate()
            .withf(move |prompt| {
                prompt.contains(&rendered)
                    && prompt.contains("Industry: general\nStage: early")
                    && prompt.contains("How do I cut costs?")
            })
            .times(1)
            .returning(|_| Ok("Renegotiate supplier terms.".into()));

        let service = AdvisorService::new(Arc::new(retriever), Arc::new(generator));
        let response = service
            .chat(request(Some("How do I cut costs?"), Some("sarah")))
            .await
            .unwrap();

        assert_eq!(response, ChatResponse::new("Renegotiate supplier terms."));
    }

    #[tokio::test]
    async fn test_unknown_business_still_generates() {
        let mut retriever = MockContextRetriever::new();
        retriever
            .expect_retrieve()
            .returning(|_| Ok(RetrievedContext::Empty));

        let mut generator = MockGenerationClient::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.contains("Business Context:\n\n\nUser Query:"))
            .times(1)
            .returning(|_| Ok("Start with a simple ledger.".into()));

        let service = AdvisorService::new(Arc::new(retriever), Arc::new(generator));
        let response = service
            .chat(request(Some("Where do I start?"), Some("nobody")))
            .await
            .unwrap();

        assert_eq!(response.answer.text, "Start with a simple ledger.");
    }

    #[tokio::test]
    async fn test_missing_query_fails_at_received() {
        let mut retriever = MockContextRetriever::new();
        retriever.expect_retrieve().never();
        let mut generator = MockGenerationClient::new();
        generator.expect_generate().never();

        let service = AdvisorService::new(Arc::new(retriever), Arc::new(generator));

        for req in [request(None, Some("sarah")), request(Some(""), None)] {
            let failure = service.chat(req).await.unwrap_err();
            assert_eq!(failure.stage, ChatStage::Received);
            assert!(matches!(failure.error, AdvisorError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_retrieval_failure_reports_profile_stage() {
        let mut retriever = MockContextRetriever::new();
        retriever
            .expect_retrieve()
            .returning(|_| Err(AdvisorError::Retrieval("qdrant down".into())));
        let mut generator = MockGenerationClient::new();
        generator.expect_generate().never();

        let service = AdvisorService::new(Arc::new(retriever), Arc::new(generator));
        let failure = service.chat(request(Some("q"), None)).await.unwrap_err();

        assert_eq!(failure.stage, ChatStage::ProfileResolved);
    }

    #[tokio::test]
    async fn test_generation_failure_renders_structured_error() {
        let mut retriever = MockContextRetriever::new();
        retriever
            .expect_retrieve()
            .returning(|_| Ok(RetrievedContext::Empty));
        let mut generator = MockGenerationClient::new();
        generator
            .expect_generate()
            .returning(|_| Err(AdvisorError::Generation("429: RESOURCE_EXHAUSTED".into())));

        let service = AdvisorService::new(Arc::new(retriever), Arc::new(generator));
        let failure = service.chat(request(Some("q"), None)).await.unwrap_err();
        assert_eq!(failure.stage, ChatStage::PromptBuilt);

        let response = failure.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "GENERATION_FAILED");
        assert_eq!(body["details"]["stage"], "prompt_built");
        assert_eq!(body["details"]["state"], "errored");
    }

    #[test]
    fn test_stage_serializes_like_display() {
        for stage in [
            ChatStage::Received,
            ChatStage::ProfileResolved,
            ChatStage::GenerationComplete,
            ChatStage::Errored,
        ] {
            assert_eq!(serde_json::to_value(stage).unwrap(), json!(stage.to_string()));
        }
    }
}
