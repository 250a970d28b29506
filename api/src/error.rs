//! Unified error types for the hookfeed API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core ingestion, storage and rendering errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Feed id present in neither the store nor the definitions
    #[error("Feed not found: {0}")]
    NotFound(String),

    /// Missing transformation, unknown feed definition, unreadable config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A transformation produced an item without a required field
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// A transformation rejected the payload
    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Materialization error: {0}")]
    Materialization(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// Classify an ingestion failure.
    ///
    /// Everything caused by the payload or the feed's configuration is a
    /// `ParseError` for the sender; storage failures stay server errors.
    pub fn from_ingest(e: DomainError) -> Self {
        match e {
            DomainError::Store(_) => AppError::Domain(e),
            other => AppError::Parse(other.to_string()),
        }
    }
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NotFound", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Configuration(msg)) => (
                StatusCode::BAD_REQUEST,
                "ConfigurationError",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Normalization(msg))
            | AppError::Domain(DomainError::Transform(msg)) => {
                (StatusCode::BAD_REQUEST, "ParseError", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Store(msg)) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Materialization(msg)) => {
                tracing::error!("Materialization error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating atom feed",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BadRequest", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", Some(msg.clone())),
            AppError::Parse(msg) => (StatusCode::BAD_REQUEST, "ParseError", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
