//! Unified error handling
//!
//! Every fallible operation in the service classifies its failure into one
//! of the [`AppError`] variants. Handlers return `Result<_, AppError>` and
//! the `IntoResponse` impl turns the variant into an HTTP status plus a
//! JSON body with a stable machine-readable `reason` and a human `error`
//! message:
//!
//! ```json
//! { "error": "amount is required", "reason": "validation_error" }
//! ```
//!
//! Store write failures deliberately have no variant here: they are logged
//! inside the document store and the operation proceeds with its in-memory
//! result.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Client errors (4xx) ==========
    /// Malformed or missing input (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, invalid or expired credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No entity matches the given key (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict (409)
    #[error("Resource already exists: {0}")]
    Conflict(String),

    // ========== Server errors (5xx) ==========
    /// Required configuration absent at call time (500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment gateway unreachable or rejected the call (500)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Anything that should never happen (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable reason string
    pub reason: &'static str,
}

impl AppError {
    /// Stable reason string for clients and log correlation
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Configuration(_) => "configuration_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Configuration(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Unified message so login cannot be used to enumerate accounts
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid email or password".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Internal detail stays in the log, a generic message goes out
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
            AppError::Configuration(msg) => {
                error!(target: "config", error = %msg, "Configuration error");
                msg.clone()
            }
            AppError::Upstream(msg) => {
                error!(target: "gateway", error = %msg, "Upstream gateway error");
                msg.clone()
            }
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        let body = Json(ErrorBody {
            error: message,
            reason: self.reason(),
        });

        (status, body).into_response()
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;
