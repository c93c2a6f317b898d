//! # Validation Module
//!
//! Input validation for operator-supplied data (reload batches, coin
//! allow-lists). Runs before any bookkeeping so a rejected batch leaves the
//! machine untouched.
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{validate_description, validate_denomination};
//!
//! assert!(validate_description("Water").is_ok());
//! assert!(validate_description("   ").is_err());
//! assert!(validate_denomination(0).is_err());
//! ```

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ProductCode, ProductReload};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product description a slot label can hold.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Most units one product slot or one coin stack can hold.
pub const MAX_STOCK_COUNT: u32 = 1_000_000;

/// Validates a product description.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
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

/// Validates a coin face value.
pub fn validate_denomination(value: u32) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::MustBePositive {
            field: "denomination".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock count after adding `added` units to `held`.
///
/// Returns the new count.
///
/// ## Rules
/// - The sum must not overflow
/// - At most MAX_STOCK_COUNT (1,000,000)
pub fn validate_stock_count(field: &str, held: u32, added: u32) -> ValidationResult<u32> {
    match held.checked_add(added) {
        Some(total) if total <= MAX_STOCK_COUNT => Ok(total),
        _ => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::from(MAX_STOCK_COUNT),
        }),
    }
}

/// Validates every entry of a product reload batch.
pub fn validate_reload_batch(batch: &BTreeMap<ProductCode, ProductReload>) -> ValidationResult<()> {
    for reload in batch.values() {
        validate_description(&reload.product.description)?;
        validate_price(reload.unit_price)?;
        validate_stock_count("count", 0, reload.count)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
