use axum::http::{HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid CORS origin '{0}'")]
pub struct InvalidOrigin(pub String);

/// CORS policy for the public API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, any method, any header.
    #[default]
    Permissive,
    /// Only the listed origins.
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Parse a comma-separated origin list; `*` or an empty value means permissive.
    ///
    /// Every listed origin must be a valid header value.
    pub fn from_origins(raw: &str) -> Result<Self, InvalidOrigin> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            return Ok(CorsPolicy::Permissive);
        }

        if let Some(bad) = origins.iter().find(|o| o.parse::<HeaderValue>().is_err()) {
            return Err(InvalidOrigin(bad.clone()));
        }

        Ok(CorsPolicy::Origins(origins))
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            CorsPolicy::Permissive => create_permissive_cors_layer(),
            CorsPolicy::Origins(origins) => {
                let values: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match o.parse::<HeaderValue>() {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!(origin = %o, "Ignoring invalid CORS origin: {}", e);
                            None
                        }
                    })
                    .collect();
                if values.is_empty() {
                    tracing::error!(
                        configured = origins.len(),
                        "No usable CORS origin, cross-origin requests will be rejected"
                    );
                }
                create_cors_layer(values)
            }
        }
    }
}

/// Creates a CORS layer restricted to the given origins.
///
/// Allows GET, POST and OPTIONS with any request header.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Creates a permissive CORS layer: all origins, methods and headers.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
