//! HTTP middleware module.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::CorsPolicy;
//!
//! let app = Router::new().layer(CorsPolicy::Permissive.layer());
//! ```

pub mod cors;

pub use cors::{CorsPolicy, InvalidOrigin, create_cors_layer, create_permissive_cors_layer};
