//! # Validation Module
//!
//! Input validation utilities shared by the calculators.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (TypeScript forms)                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Wire DTO (serde)                                             │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Ranges, signs and formats; all checked before any arithmetic      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use licita_core::validation::{validate_positive, validate_cnpj};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_positive("unitCost", Decimal::from(100)).is_ok());
//! assert_eq!(validate_cnpj("11.222.333/0001-81").unwrap(), "11222333000181");
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, service, client, proposal number).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LENGTH`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a value is strictly greater than zero.
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that a value is zero or greater.
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an upper magnitude bound.
///
/// The bounds keep every intermediate product of the calculators inside the
/// range of `Decimal`.
pub fn validate_at_most(field: &str, value: Decimal, max: Decimal) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// `validate_positive` followed by `validate_at_most`.
pub fn validate_positive_bounded(
    field: &str,
    value: Decimal,
    max: Decimal,
) -> ValidationResult<()> {
    validate_positive(field, value)?;
    validate_at_most(field, value, max)
}

/// `validate_non_negative` followed by `validate_at_most`.
pub fn validate_non_negative_bounded(
    field: &str,
    value: Decimal,
    max: Decimal,
) -> ValidationResult<()> {
    validate_non_negative(field, value)?;
    validate_at_most(field, value, max)
}

// =============================================================================
// CNPJ Validator
// =============================================================================

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Validates a CNPJ (Brazilian company registration number).
///
/// ## Rules
/// - Punctuation is ignored (`11.222.333/0001-81` is accepted)
/// - Exactly 14 digits
/// - Not all digits equal (`00000000000000` passes the checksum but is invalid)
/// - Both mod-11 check digits must match
///
/// ## Returns
/// The normalized 14-digit string.
pub fn validate_cnpj(cnpj: &str) -> ValidationResult<String> {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "cnpj".to_string(),
        reason: reason.to_string(),
    };

    if cnpj.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cnpj".to_string(),
        });
    }

    if digits.len() != 14 {
        return Err(invalid("must contain 14 digits"));
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return Err(invalid("digits must not all be equal"));
    }

    let first = cnpj_check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
    let second = cnpj_check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS);

    if digits[12] != first || digits[13] != second {
        return Err(invalid("check digits do not match"));
    }

    Ok(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect())
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("productName", "  Cimento CP-II ").unwrap(), "Cimento CP-II");
        assert!(validate_name("productName", "").is_err());
        assert!(validate_name("productName", "   ").is_err());
        assert!(validate_name("productName", &"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(validate_name("productName", &"A".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("quantity", Decimal::ONE).is_ok());
        assert!(validate_positive("quantity", Decimal::new(1, 2)).is_ok());
        assert!(validate_positive("quantity", Decimal::ZERO).is_err());
        assert!(validate_positive("quantity", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("laborCost", Decimal::ZERO).is_ok());
        assert!(validate_non_negative("laborCost", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_validate_at_most() {
        let max = Decimal::from(1000);
        assert!(validate_at_most("weight", Decimal::from(1000), max).is_ok());
        let err = validate_at_most("weight", Decimal::from(1001), max).unwrap_err();
        assert_eq!(err.code(), "TOO_LARGE");
    }

    #[test]
    fn test_validate_cnpj() {
        assert_eq!(validate_cnpj("11222333000181").unwrap(), "11222333000181");
        assert_eq!(validate_cnpj("11.222.333/0001-81").unwrap(), "11222333000181");

        assert!(validate_cnpj("").is_err());
        assert!(validate_cnpj("11222333000182").is_err());
        assert!(validate_cnpj("1122233300018").is_err());
        assert!(validate_cnpj("00000000000000").is_err());
        assert!(validate_cnpj("11111111111111").is_err());
    }
}
