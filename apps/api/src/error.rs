//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in SweetShop                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bad id / body? ──── ValidationError ──────────┐                        │
//! │         │                                      │                        │
//! │         ▼                                      ▼                        │
//! │  Rule failure? ───── CoreError ───────────► ApiError ──► IntoResponse   │
//! │         │                                      ▲                        │
//! │         ▼                                      │                        │
//! │  Storage failure? ── DbError ──────────────────┘                        │
//! │                                                                         │
//! │  Response body:                                                         │
//! │  { "success": false, "message": "Sweet not found",                      │
//! │    "code": "NOT_FOUND" }                                                │
//! │                                                                         │
//! │  Storage failures add the driver text:                                  │
//! │  { ..., "code": "DATABASE_ERROR", "error": "no such table: sweets" }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged with `tracing::error!` and answered with a
//! 500 whose `message` is generic and whose `error` carries the underlying
//! database message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sweetshop_core::{CoreError, ValidationError};
use sweetshop_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Underlying cause, written as `error` in the body when present
    pub detail: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource or route not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Purchase exceeds stock (409)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// A 500 for a storage failure, keeping the driver's message.
    fn database(message: &str, detail: String) -> Self {
        ApiError {
            detail: Some(detail),
            ..ApiError::new(ErrorCode::DatabaseError, message)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Body written for every failed request.
#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
            code: self.code,
            error: self.detail.as_deref(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SweetNotFound(_) => ApiError::not_found("Sweet not found"),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found("Sweet not found"),
            DbError::Core(e) => e.into(),
            DbError::ConstraintViolation { message } => {
                tracing::warn!("Constraint violation: {}", message);
                ApiError::validation("Invalid sweet data")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::database("Database connection failed", e)
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::database("Database migration failed", e)
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::database("Database operation failed", e)
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::database("Database transaction failed", e)
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::database("Database pool exhausted", DbError::PoolExhausted.to_string())
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::database("Database operation failed", e)
            }
        }
    }
}

/// Malformed or mistyped JSON bodies answer 400 in the usual envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            _ => format!("Invalid request body: {}", rejection.body_text()),
        };
        ApiError::validation(message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
