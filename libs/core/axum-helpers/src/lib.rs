//! Shared HTTP plumbing for the Axum services in this workspace.
//!
//! - `errors`: the `ErrorResponse` body, `AppError`, error codes and fallbacks
//! - `extractors`: `ValidatedJson`
//! - `http`: CORS policy
//! - `server`: router assembly with Swagger UI, health routes, graceful shutdown
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::Router;
//! use axum_helpers::{CorsPolicy, create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes, &CorsPolicy::Permissive);
//!
//!     create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{CorsPolicy, InvalidOrigin, create_cors_layer, create_permissive_cors_layer};

pub use errors::{
    AppError, ErrorCode, ErrorResponse, error_response, error_response_with_details,
};

pub use extractors::ValidatedJson;
