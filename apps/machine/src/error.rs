//! # Machine Errors
//!
//! Errors surfaced by the machine runtime.
//!
//! ## Error Flow
//! ```text
//! CoreError (vend-core) ──┐
//! toml / io errors ───────┼──► MachineError ──► front panel / operator log
//! config checks ──────────┘
//! ```

use thiserror::Error;
use vend_core::{CoreError, ValidationError};

/// Result type alias for machine operations.
pub type MachineResult<T> = Result<T, MachineError>;

#[derive(Debug, Error)]
pub enum MachineError {
    /// A purchase, reload or coin operation failed in the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The config file couldn't be read.
    #[error("Failed to load config: {0}")]
    ConfigLoad(#[from] std::io::Error),

    /// The config file isn't valid TOML for `MachineConfig`.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but describes an unusable machine.
    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(String),
}

impl From<ValidationError> for MachineError {
    fn from(err: ValidationError) -> Self {
        MachineError::Core(CoreError::Validation(err))
    }
}

impl MachineError {
    /// True when the customer can act on the error (add coins, pick another
    /// product, retrieve coins). False for operator or bookkeeping faults.
    pub fn is_customer_facing(&self) -> bool {
        match self {
            MachineError::Core(core) => matches!(
                core,
                CoreError::ProductNotFound { .. }
                    | CoreError::OutOfStock { .. }
                    | CoreError::InsufficientFunds { .. }
                    | CoreError::UnrecognizedCoin { .. }
                    | CoreError::ExactChangeUnavailable { .. }
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vend_core::Money;

    #[test]
    fn test_core_errors_pass_through() {
        let err: MachineError = CoreError::ProductNotFound { code: 3 }.into();
        assert_eq!(err.to_string(), "Product not found: code 3");
        assert!(err.is_customer_facing());
    }

    #[test]
    fn test_operator_errors_are_not_customer_facing() {
        let err = MachineError::InvalidConfig("no coins".to_string());
        assert!(!err.is_customer_facing());

        let err: MachineError = CoreError::IdentityConflict { conflicts: vec![] }.into();
        assert!(!err.is_customer_facing());

        let err: MachineError = CoreError::InsufficientFunds {
            code: 1,
            price: Money::from_minor(100),
            inserted: Money::zero(),
        }
        .into();
        assert!(err.is_customer_facing());
    }
}
