use axum::Router;

pub mod advisor;
pub mod health;

/// API routes, served from the root by `create_router`.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().merge(advisor::router(state))
}

/// Creates a router with the /ready endpoint that checks the context source.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
