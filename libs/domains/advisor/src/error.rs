use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{ErrorCode, error_response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A corpus or business-record file is missing or malformed
    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// Ingestion stopped at `at`: a document id, or `collection <name>` when
    /// preparing or counting the collection failed. Later documents were not
    /// attempted.
    #[error("Ingestion failed at {at}: {reason}")]
    Ingestion { at: String, reason: String },

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Qdrant error: {0}")]
    VectorStore(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

impl AdvisorError {
    pub fn load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        AdvisorError::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status and error code this error is reported with.
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AdvisorError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AdvisorError::Retrieval(_) => (StatusCode::BAD_GATEWAY, ErrorCode::RetrievalFailed),
            AdvisorError::Generation(_) => (StatusCode::BAD_GATEWAY, ErrorCode::GenerationFailed),
            AdvisorError::VectorStore(_) => (StatusCode::BAD_GATEWAY, ErrorCode::VectorStoreError),
            AdvisorError::Embedding(_) => (StatusCode::BAD_GATEWAY, ErrorCode::EmbeddingError),
            AdvisorError::Load { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ContextLoadFailed,
            ),
            AdvisorError::Ingestion { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::IngestionFailed,
            ),
            AdvisorError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ConfigurationError,
            ),
        }
    }
}

impl From<qdrant_client::QdrantError> for AdvisorError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        AdvisorError::VectorStore(err.to_string())
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        AdvisorError::Embedding(err.to_string())
    }
}

impl From<core_config::ConfigError> for AdvisorError {
    fn from(err: core_config::ConfigError) -> Self {
        AdvisorError::Config(err.to_string())
    }
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error_code = code.code(), "{}", self);
        } else {
            tracing::info!(error_code = code.code(), "{}", self);
        }
        error_response(status, self.to_string(), code)
    }
}
