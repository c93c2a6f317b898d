//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  ├── CoreError        - Purchase, reload and reserve failures          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vend-machine errors (app crate)                                       │
//! │  └── MachineError     - Config loading + wrapped CoreError             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → MachineError → front panel        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Customer-facing vs internal
//! Every variant except `InsufficientReserve` is an expected outcome the
//! front panel reports to the customer or operator. `InsufficientReserve`
//! means the bookkeeping itself is inconsistent.

use std::fmt;

use thiserror::Error;

use crate::money::{Denomination, Money};
use crate::types::ProductCode;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product has ever been loaded under this code.
    #[error("Product not found: code {code}")]
    ProductNotFound { code: ProductCode },

    /// The product is known but its dispenser is empty.
    #[error("Out of stock: {description} (code {code})")]
    OutOfStock {
        code: ProductCode,
        description: String,
    },

    /// Inserted coins don't cover the price. The coins stay pending.
    ///
    /// ## User Workflow
    /// ```text
    /// Insert 50, 20, 10 (pending 80)
    ///      │
    ///      ▼
    /// Select code 1 (price 100)
    ///      │
    ///      ▼
    /// InsufficientFunds { price: 100p, inserted: 80p }
    ///      │
    ///      ▼
    /// Panel shows: "PLEASE INSERT MORE COINS", coins still retrievable
    /// ```
    #[error("Insufficient funds for code {code}: price {price}, inserted {inserted}")]
    InsufficientFunds {
        code: ProductCode,
        price: Money,
        inserted: Money,
    },

    /// The coin slot doesn't accept this value. Nothing was mutated.
    #[error("Unrecognized coin: {denomination}p (inserted amount still {pending_total})")]
    UnrecognizedCoin {
        denomination: u32,
        pending_total: Money,
    },

    /// A reload batch tried to put a different product in a non-empty
    /// dispenser. The whole batch was rejected.
    #[error("Reload rejected: {}", ConflictList(.conflicts))]
    IdentityConflict { conflicts: Vec<ReloadConflict> },

    /// Attempt to withdraw more coins than the reserve holds.
    ///
    /// Change strategies never request more than they see, so this is a
    /// bookkeeping fault rather than a customer-facing condition.
    #[error("Insufficient reserve of {denomination}: requested {requested}, available {available}")]
    InsufficientReserve {
        denomination: Denomination,
        requested: u32,
        available: u32,
    },

    /// The exact-change strategy found no combination of reserve coins that
    /// sums to the amount owed. The sale was not made.
    #[error("Exact change of {owed} cannot be made from the reserve")]
    ExactChangeUnavailable { owed: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for internal-consistency faults (programming errors).
    pub fn is_internal(&self) -> bool {
        matches!(self, CoreError::InsufficientReserve { .. })
    }
}

// =============================================================================
// Reload Conflict
// =============================================================================

/// One code in a reload batch whose description differs from the stock
/// already in the dispenser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadConflict {
    pub code: ProductCode,
    pub existing: String,
    pub existing_count: u32,
    pub incoming: String,
}

impl fmt::Display for ReloadConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "can't load {} into code {} while it holds {} units of {}",
            self.incoming, self.code, self.existing_count, self.existing
        )
    }
}

struct ConflictList<'a>(&'a [ReloadConflict]);

impl fmt::Display for ConflictList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conflict) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{conflict}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator or config input doesn't meet
/// requirements. Used before any bookkeeping runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
