//! # Error Types
//!
//! Domain-specific error types for inspect-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inspect-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ParseError       - Why a scan payload was not recognized          │
//! │                                                                         │
//! │  inspect-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  inspect-api errors (in app)                                           │
//! │  └── ApiError         - What the web client sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, marker, length)
//! 3. Errors are enum variants, never String
//! 4. `ParseError` never crosses the parser's public contract: callers of
//!    [`parse_product_code`](crate::product_code::parse_product_code) only see
//!    `None`. It exists so the failure reason can be logged.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// User cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Email or username is already registered.
    ///
    /// ## When This Occurs
    /// - Register with an email that already has an account
    /// - Register with a username someone else picked
    #[error("Email or username is already in use")]
    AccountExists,

    /// Login failed. Deliberately does not say which half was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A scan payload could not be turned into a product name.
    ///
    /// ## User Workflow
    /// ```text
    /// Camera scan ──► raw text
    ///      │
    ///      ▼
    /// parse_product_code(raw) = None
    ///      │
    ///      ▼
    /// UnrecognizedScan
    ///      │
    ///      ▼
    /// UI shows: "Could not read the code, rescan or type it manually"
    /// ```
    #[error("Scanned code was not recognized")]
    UnrecognizedScan,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything touches the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, bad base64).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Parse Error
// =============================================================================

/// Reason a scan payload did not yield a product name.
///
/// The Data-Matrix path reports the first step that failed. When the label
/// fallback also finds nothing, the Data-Matrix reason is kept inside
/// [`ParseError::Unrecognized`] so a single log line explains both attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Payload was empty or whitespace only.
    #[error("scan payload is empty")]
    EmptyPayload,

    /// A literal marker such as `VSBH4` or `SH` is absent.
    #[error("marker {0:?} not found")]
    MissingMarker(&'static str),

    /// No GS-introduced field with the given tag.
    #[error("field {0:?} not found")]
    MissingField(char),

    /// Field value is shorter than the slice taken from it.
    #[error("field {field:?} has {len} characters, need at least {min}")]
    FieldTooShort { field: char, len: usize, min: usize },

    /// The digit window of a field holds fewer digits than required.
    #[error("field {field:?} yields {found} digits, need {needed}")]
    NotEnoughDigits {
        field: char,
        found: usize,
        needed: usize,
    },

    /// Neither the Data-Matrix path nor any label pattern matched.
    #[error("no label pattern matched (data-matrix: {data_matrix})")]
    Unrecognized { data_matrix: Box<ParseError> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "productName".to_string(),
        };
        assert_eq!(err.to_string(), "productName is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "inspector".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_parse_error_keeps_data_matrix_reason() {
        let err = ParseError::Unrecognized {
            data_matrix: Box::new(ParseError::MissingMarker("VSBH4")),
        };
        assert_eq!(
            err.to_string(),
            "no label pattern matched (data-matrix: marker \"VSBH4\" not found)"
        );
    }
}
