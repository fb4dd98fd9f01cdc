//! # API Error Type
//!
//! Unified error type for the HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ROSE POS                               │
//! │                                                                         │
//! │  Client                       rose-server                               │
//! │  ──────                       ───────────                               │
//! │                                                                         │
//! │  POST /api/pos/sales                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<Json<T>, ApiError>                              │  │
//! │  │         │                                                        │  │
//! │  │  DbError ────────► ApiError { DATABASE_ERROR } (details logged)  │  │
//! │  │  CoreError ──────► ApiError { BUSINESS_LOGIC | ... }             │  │
//! │  │  AuthError ──────► ApiError { UNAUTHORIZED }                     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  IntoResponse: (StatusCode, Json<ApiError>)                      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "CONFIRMATION_REQUIRED",                                     │
//! │    "message": "¿Estás seguro de eliminar esta venta?" }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `message` is what the client puts in its alert, so user-facing
//! messages stay in Spanish and internal failures never leak details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rose_core::{CoreError, ValidationError};
use rose_db::DbError;
use serde::Serialize;

use crate::auth::AuthError;

/// API error returned from handlers.
///
/// ```json
/// {
///   "code": "MISSING_DATA",
///   "message": "Faltan datos"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Creation dialog left a field empty (400)
    MissingData,

    /// Sign-in failed or admin token missing / invalid (401)
    Unauthorized,

    /// The action needs the user to accept a prompt first (409)
    ConfirmationRequired,

    /// Business rule rejected the request (422)
    BusinessLogic,

    /// Share requested for a day without sales (422)
    NothingToReport,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::MissingData => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::ConfirmationRequired => StatusCode::CONFLICT,
            ErrorCode::BusinessLogic | ErrorCode::NothingToReport => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::validation("Invalid value")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::ToppingNotFound(id) => ApiError::not_found("Topping", id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", id),
            CoreError::ConfirmationRequired { prompt } => ApiError::new(ErrorCode::ConfirmationRequired, prompt),
            CoreError::MissingData => ApiError::new(ErrorCode::MissingData, err.to_string()),
            CoreError::NothingToReport => ApiError::new(ErrorCode::NothingToReport, err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::ProductInactive { .. }
            | CoreError::ToppingInactive { .. }
            | CoreError::ToppingsNotAllowed { .. }
            | CoreError::ToppingNotOffered { .. }
            | CoreError::DateOutOfRange(_) => ApiError::new(ErrorCode::BusinessLogic, err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenIssue(e) => {
                tracing::error!("Token issue failed: {}", e);
                ApiError::internal("Could not start session")
            }
            AuthError::Db(e) => ApiError::from(e),
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ApiError::not_found("Sale", 42);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("NOT_FOUND"));
        assert!(json.contains("Sale not found: 42"));
    }

    #[test]
    fn test_core_errors_keep_user_messages() {
        let err = ApiError::from(CoreError::MissingData);
        assert_eq!(err.code, ErrorCode::MissingData);
        assert_eq!(err.message, "Faltan datos");
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(CoreError::ConfirmationRequired {
            prompt: "¿Seguro?".to_string(),
        });
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "¿Seguro?");

        let err = ApiError::from(CoreError::ToppingNotOffered {
            product: "Malteadas".to_string(),
            topping: "Helado".to_string(),
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_db_internals_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: sales".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("sales"));

        let err = ApiError::from(DbError::not_found("Product", 9));
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Credenciales incorrectas");
    }
}
