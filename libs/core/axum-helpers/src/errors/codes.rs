//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    // Pipeline errors (2000s)
    /// A context source (corpus or record file) could not be read
    ContextLoadFailed,

    /// Embedding ingestion aborted
    IngestionFailed,

    /// Context retrieval failed
    RetrievalFailed,

    /// The generation model call failed
    GenerationFailed,

    /// Vector store request failed
    VectorStoreError,

    /// Embedding model request failed
    EmbeddingError,

    /// Invalid or missing configuration
    ConfigurationError,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::GenerationFailed.as_str(), "GENERATION_FAILED");
    /// assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::ContextLoadFailed => "CONTEXT_LOAD_FAILED",
            Self::IngestionFailed => "INGESTION_FAILED",
            Self::RetrievalFailed => "RETRIEVAL_FAILED",
            Self::GenerationFailed => "GENERATION_FAILED",
            Self::VectorStoreError => "VECTOR_STORE_ERROR",
            Self::EmbeddingError => "EMBEDDING_ERROR",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1999: Request errors
    /// - 2000-2999: Retrieval pipeline errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,

            Self::ContextLoadFailed => 2001,
            Self::IngestionFailed => 2002,
            Self::RetrievalFailed => 2003,
            Self::GenerationFailed => 2004,
            Self::VectorStoreError => 2005,
            Self::EmbeddingError => 2006,
            Self::ConfigurationError => 2007,
        }
    }

    /// Get the default user-facing error message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::ContextLoadFailed => "Business context could not be loaded",
            Self::IngestionFailed => "Document ingestion failed",
            Self::RetrievalFailed => "Context retrieval failed",
            Self::GenerationFailed => "Answer generation failed",
            Self::VectorStoreError => "Vector store request failed",
            Self::EmbeddingError => "Embedding request failed",
            Self::ConfigurationError => "Service is misconfigured",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
