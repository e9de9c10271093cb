//! # Validation Module
//!
//! Input validation utilities for the inspection service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client (TypeScript)                                      │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: lengths, formats                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE email / username                                           │
//! │  └── Foreign key inspections.user_id                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_PRODUCT_NAME_LEN: usize = 100;
pub const MAX_INSPECTOR_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 5000;
pub const MAX_SCAN_PAYLOAD_LEN: usize = 4096;

// =============================================================================
// Helpers
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn at_most(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a login email.
///
/// ## Rules
/// - Must not be empty
/// - At most 254 characters
/// - Exactly one `@` with something on both sides
/// - No whitespace
///
/// ## Example
/// ```rust
/// use inspect_core::validation::validate_email;
///
/// assert!(validate_email("kim@example.com").is_ok());
/// assert!(validate_email("kim.example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    required("email", email)?;
    at_most("email", email, MAX_EMAIL_LEN)?;

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email", "must not contain whitespace"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid("email", "must be a valid email address")),
    }
}

/// Validates a username: 3 to 50 characters of letters, digits, `-`, `_`, `.`.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    required("username", username)?;

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME_LEN,
        });
    }
    at_most("username", username, MAX_USERNAME_LEN)?;

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(invalid(
            "username",
            "must contain only letters, numbers, hyphens, underscores and dots",
        ));
    }

    Ok(())
}

/// Validates a password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    at_most("password", password, MAX_PASSWORD_LEN)
}

// =============================================================================
// Inspection Validators
// =============================================================================

/// Validates a product name (scanned or typed).
///
/// ## Example
/// ```rust
/// use inspect_core::validation::validate_product_name;
///
/// assert!(validate_product_name("91958CU810JW007").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("productName", name)?;
    at_most("productName", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates the inspector's name.
pub fn validate_inspector(inspector: &str) -> ValidationResult<()> {
    required("inspector", inspector)?;
    at_most("inspector", inspector, MAX_INSPECTOR_LEN)
}

/// Notes are optional; only the length is checked.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    at_most("notes", notes, MAX_NOTES_LEN)
}

/// Caps the size of raw scan text. Empty payloads pass; the parser treats
/// them as no-match.
pub fn validate_scan_payload(raw: &str) -> ValidationResult<()> {
    at_most("raw", raw, MAX_SCAN_PAYLOAD_LEN)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("kim@example.com").is_ok());
        assert!(validate_email("a@b").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("kim").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("kim@").is_err());
        assert!(validate_email("kim@@example.com").is_err());
        assert!(validate_email("kim lee@example.com").is_err());
        assert!(validate_email(&format!("{}@x.io", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("kim").is_ok());
        assert!(validate_username("inspector_01.line-2").is_ok());

        assert!(matches!(
            validate_username("ab"),
            Err(ValidationError::TooShort { min: 3, .. })
        ));
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_inspection_fields() {
        assert!(validate_product_name("91958PI010").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"X".repeat(101)).is_err());

        assert!(validate_inspector("김검사").is_ok());
        assert!(validate_inspector("").is_err());

        assert!(validate_notes("").is_ok());
        assert!(validate_notes(&"n".repeat(5001)).is_err());
    }

    #[test]
    fn test_lengths_count_characters() {
        // 100 three-byte characters is still 100 characters.
        assert!(validate_product_name(&"검".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_scan_payload() {
        assert!(validate_scan_payload("").is_ok());
        assert!(validate_scan_payload(&"9".repeat(4096)).is_ok());
        assert!(validate_scan_payload(&"9".repeat(4097)).is_err());
    }
}
