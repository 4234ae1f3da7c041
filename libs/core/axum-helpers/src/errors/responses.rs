//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "CONTEXT_LOAD_FAILED",
        "message": "Failed to load data/business_profiles.json: No such file or directory",
        "details": { "stage": "profile_resolved" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "query": [{
                "code": "required",
                "message": "query is required",
                "params": {}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - an upstream model or vector store failed",
    content_type = "application/json",
    example = json!({
        "code": 2004,
        "error": "GENERATION_FAILED",
        "message": "Generation error: Vertex AI returned 429",
        "details": { "stage": "prompt_built" }
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);
