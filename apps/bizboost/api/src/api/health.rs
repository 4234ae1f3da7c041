//! Readiness check against the configured context source.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_advisor::RetrievalPolicy;

/// Keyed retrieval needs a readable business-record file; similarity
/// retrieval needs a reachable vector store.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let name = match state.config.advisor.retrieval_policy {
        RetrievalPolicy::Keyed => "business_records",
        RetrievalPolicy::Similarity => "vector_store",
    };

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        name,
        Box::pin(async {
            state
                .advisor
                .check_ready()
                .await
                .map_err(|e| format!("Context source check failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
