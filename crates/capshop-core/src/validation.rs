//! # Validation Module
//!
//! Input rules shared by the cart and the session simulator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Forms (TypeScript, out of tree)                              │
//! │  ├── Confirm-password match                                            │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Email shape                                                       │
//! │  ├── Password length policy                                            │
//! │  └── Non-negative prices                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores (capshop-store)                                       │
//! │  └── Uniqueness (duplicate email), credential checks                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest email accepted (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Longest password accepted. Keeps hashing cost bounded.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_EMAIL_LENGTH`] characters
/// - Exactly one `@`, with a non-empty local part and a dotted domain
/// - No whitespace
///
/// The value is not normalized here; case handling is a store policy.
///
/// ```rust
/// use capshop_core::validation::validate_email;
///
/// assert!(validate_email("fan@capshop.test").is_ok());
/// assert!(validate_email("no-at-sign").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one '@' after a local part"));
    }

    let dotted = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !dotted {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(())
}

/// Validates a password against the minimum length policy.
///
/// Length is counted in characters, not bytes.
///
/// ```rust
/// use capshop_core::validation::validate_password;
///
/// assert!(validate_password("secret1", 6).is_ok());
/// assert!(validate_password("short", 6).is_err());
/// ```
pub fn validate_password(password: &str, min_length: usize) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    let len = password.chars().count();
    if len < min_length {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: min_length,
        });
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Validates a unit price. Free items are allowed, negative prices are not.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
