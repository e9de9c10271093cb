//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Inspect API                        │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ├── ValidationError ──────────┐                                │
//! │         ├── CoreError ────────────────┤                                │
//! │         ├── DbError (logged) ─────────┼──► ApiError { code, message }  │
//! │         ├── JsonRejection ────────────┤              │                 │
//! │         └── auth failures ────────────┘              ▼                 │
//! │                                             IntoResponse               │
//! │                                             status from code           │
//! │                                                                         │
//! │  Body the web client receives:                                         │
//! │  { "success": false, "code": "VALIDATION_ERROR", "error": "..." }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use inspect_core::{CoreError, ValidationError};
use inspect_db::DbError;

/// Error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in the Web Client
/// ```typescript
/// const res = await fetch('/api/scan', { method: 'POST', body });
/// const body = await res.json();
/// if (!body.success && body.code === 'NO_MATCH') {
///   showManualEntry();
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Email or username already registered (400)
    AccountExists,

    /// Missing or malformed Authorization header (401)
    AuthRequired,

    /// Wrong email or password (401)
    InvalidCredentials,

    /// Token present but invalid or expired (403)
    InvalidToken,

    /// Resource not found (404)
    NotFound,

    /// Scan payload not recognized (422)
    NoMatch,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::AccountExists => StatusCode::BAD_REQUEST,
            ErrorCode::AuthRequired | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidToken => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::NoMatch => StatusCode::UNPROCESSABLE_ENTITY,
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
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn auth_required() -> Self {
        ApiError::new(ErrorCode::AuthRequired, "Authentication token is required")
    }

    pub fn invalid_token() -> Self {
        ApiError::new(ErrorCode::InvalidToken, "Invalid or expired token")
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    code: ErrorCode,
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            code: self.code,
            error: &self.message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, .. } => {
                tracing::debug!(%field, "Unique violation");
                ApiError::new(ErrorCode::AccountExists, CoreError::AccountExists.to_string())
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::MigrationFailed(e)
            | DbError::QueryFailed(e)
            | DbError::Serialization(e)
            | DbError::PasswordHash(e)
            | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserNotFound(id) => ApiError::not_found("User", &id),
            CoreError::AccountExists => ApiError::new(ErrorCode::AccountExists, err.to_string()),
            CoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, err.to_string())
            }
            CoreError::UnrecognizedScan => ApiError::new(
                ErrorCode::NoMatch,
                "Code not recognized. Rescan or type the product name manually.",
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or missing JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
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
    fn test_status_mapping() {
        assert_eq!(ErrorCode::AuthRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NoMatch.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::AccountExists.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_details_are_hidden() {
        let err: ApiError = DbError::QueryFailed("no such table: users".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("users"));
    }

    #[test]
    fn test_code_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidCredentials).unwrap(),
            "\"INVALID_CREDENTIALS\""
        );
    }
}
