//! # Error Types
//!
//! Domain-specific error types for licita-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  licita-core errors (this file)                                        │
//! │  ├── CoreError        - Calculator failures                            │
//! │  │   ├── Validation   - caller sent malformed/out-of-range input       │
//! │  │   └── Precondition - computed invariant violated (e.g. ÷ 0)         │
//! │  └── ValidationError  - One variant per violated constraint kind       │
//! │                                                                         │
//! │  licita-db errors (separate crate)                                     │
//! │  └── DbError          - Persistence failures (dependency unavailable)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller maps `code()` to form field │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant names the offending field
//! 3. Every variant has a stable machine-readable code
//! 4. Fail fast: no partial result is ever returned alongside an error

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the calculators and the classifier helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Input rejected before any computation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A value computed from valid input broke an invariant a later stage
    /// depends on.
    ///
    /// ## When This Occurs
    /// - BDI percentage with a total direct cost that rounds to R$ 0,00
    #[error("Precondition failed: {reason}")]
    Precondition { reason: String },
}

impl CoreError {
    /// Stable reason code for the caller's error mapping.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(err) => err.code(),
            CoreError::Precondition { .. } => "PRECONDITION_FAILED",
        }
    }

    /// The input field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::Validation(err) => Some(err.field()),
            CoreError::Precondition { .. } => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Range checks never clamp: an out-of-range value is always an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Percentage outside `[0, 100]`.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: String, value: Decimal },

    /// Value above the supported magnitude.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: Decimal },

    /// Invalid format (e.g., invalid date, invalid CNPJ).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A list has fewer entries than required.
    #[error("{field} must contain at least {min} item(s)")]
    TooFewItems { field: String, min: usize },

    /// A list has more entries than allowed.
    #[error("{field} must contain at most {max} item(s)")]
    TooManyItems { field: String, max: usize },
}

impl ValidationError {
    /// Stable reason code, one per constraint kind.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "REQUIRED",
            ValidationError::TooLong { .. } => "TOO_LONG",
            ValidationError::MustBePositive { .. } => "MUST_BE_POSITIVE",
            ValidationError::MustNotBeNegative { .. } => "MUST_NOT_BE_NEGATIVE",
            ValidationError::PercentageOutOfRange { .. } => "PERCENTAGE_OUT_OF_RANGE",
            ValidationError::TooLarge { .. } => "TOO_LARGE",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::TooFewItems { .. } => "TOO_FEW_ITEMS",
            ValidationError::TooManyItems { .. } => "TOO_MANY_ITEMS",
        }
    }

    /// The offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::PercentageOutOfRange { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::TooFewItems { field, .. }
            | ValidationError::TooManyItems { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
