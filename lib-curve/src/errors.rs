//! Curve Errors

use thiserror::Error;
use lib_types::Amount;

/// Error during curve pricing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("Invalid curve parameters: {0}")]
    InvalidParameters(String),

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Cannot sell {requested} tokens: only {sold} were issued through the curve")]
    InsufficientHistory { requested: Amount, sold: Amount },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Curve invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for curve operations
pub type CurveResult<T> = Result<T, CurveError>;
