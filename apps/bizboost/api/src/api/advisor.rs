use axum::Router;
use domain_advisor::handlers;

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(state.advisor.clone())
}
