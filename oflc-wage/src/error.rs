//! Error types for oflc-wage
//!
//! Validation failures are reported before any query runs. Not-found results carry
//! the stage that came up empty so callers can show a specific message. An
//! unavailable store is kept apart from "found nothing" because it points at a
//! maintenance problem rather than an empty answer.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Which lookup stage produced no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundStage {
    /// No occupation matched the job title
    Occupations,
    /// No geography row matched the location
    Locations,
    /// Occupations and locations matched but no wage record joined them
    WageData,
    /// Locations matched but no wage record fell inside the salary range
    SalaryData,
}

impl NotFoundStage {
    pub fn message(self) -> &'static str {
        match self {
            NotFoundStage::Occupations => "No matching occupations found",
            NotFoundStage::Locations => "No matching locations found",
            NotFoundStage::WageData => "No matching wage data found",
            NotFoundStage::SalaryData => "No matching salary data found",
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required field (400)
    #[error("{0}")]
    Validation(String),

    /// A lookup stage matched nothing (404)
    #[error("{}", .0.message())]
    NotFound(NotFoundStage),

    /// Reference store missing, unpopulated, or being rebuilt (503)
    #[error("Reference store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store lookup exceeded its time bound (504)
    #[error("Store lookup timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Request body is not JSON or has an unreadable field (400)
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Storage-layer fault (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// oflc-common error (500)
    #[error("{0}")]
    Common(#[from] oflc_common::Error),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ApiError::Database(_) | ApiError::Common(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Database(_) | ApiError::Common(_) => {
                error!("Request failed: {}", self);
                "Internal error while querying the reference store".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Result type for API handlers and search operations
pub type ApiResult<T> = Result<T, ApiError>;
