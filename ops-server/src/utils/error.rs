//! Unified error handling
//!
//! Application error type and API response envelope.
//!
//! # Error code map
//!
//! | Code  | HTTP | Meaning |
//! |-------|------|---------|
//! | E0000 | 200  | success |
//! | E0002 | 400  | validation failed |
//! | E0003 | 404  | resource not found |
//! | E0004 | 409  | conflict (terminal-state violation) |
//! | E0005 | 422  | business rule violation |
//! | E9001 | 500  | internal error |
//! | E9002 | 500  | database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response structure
///
/// ```json
/// { "code": "E0000", "message": "Success", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {message}")]
    BusinessRule {
        message: String,
        /// Structured detail the caller can act on (e.g. the computed
        /// outstanding balance behind a rejected dispatch)
        details: Option<serde_json::Value>,
    },

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self::BusinessRule {
            message: msg.into(),
            details,
        }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, data) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg, None),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg, None),

            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg, None),

            AppError::BusinessRule { message, details } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", message, details)
            }

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    None,
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(AppResponse::<serde_json::Value> {
            code: code.to_string(),
            message,
            data,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::BalanceExceeded(balance_due) => AppError::BusinessRule {
                message: format!(
                    "Driver has an outstanding balance of {balance_due}; settle before dispatching"
                ),
                details: Some(serde_json::json!({ "balance_due": balance_due })),
            },
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
