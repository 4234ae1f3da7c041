use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadGatewayResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Answer, ChatRequest, ChatResponse, UserProfile};
use crate::service::{AdvisorService, ChatFailure};

pub const TAG: &str = "advisor";

/// OpenAPI documentation for the advisor API
#[derive(OpenApi)]
#[openapi(
    paths(chat),
    components(
        schemas(ChatRequest, ChatResponse, Answer, UserProfile),
        responses(
            BadRequestValidationResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Business recommendations grounded in retrieved context")
    )
)]
pub struct ApiDoc;

/// Create the advisor router
pub fn router(service: AdvisorService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/chat", post(chat))
        .with_state(shared_service)
}

/// Ask the advisor a question
#[utoipa::path(
    post,
    path = "/chat",
    tag = TAG,
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated recommendation", body = ChatResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn chat(
    State(service): State<Arc<AdvisorService>>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatFailure> {
    let response = service.chat(request).await?;
    Ok(Json(response))
}
