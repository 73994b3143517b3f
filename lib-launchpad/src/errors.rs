//! Launch Registry Errors

use thiserror::Error;
use lib_curve::CurveError;
use lib_types::{Address, Amount, AssetId, Bps};

/// Error during launch or settlement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Insufficient launch fee: required {required}, paid {paid}")]
    InsufficientFee { required: Amount, paid: Amount },

    #[error("Fee too high: {field} = {value} exceeds cap {cap}")]
    FeeTooHigh {
        field: &'static str,
        value: Amount,
        cap: Amount,
    },

    #[error("Asset already exists: {0}")]
    DuplicateAsset(AssetId),

    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    #[error("Trading closed for asset {0}: asset has graduated")]
    TradingClosed(AssetId),

    #[error("Slippage exceeded: expected at least {minimum}, got {actual}")]
    SlippageExceeded { minimum: Amount, actual: Amount },

    #[error("Cannot sell {requested} tokens: only {sold} were issued through the curve")]
    InsufficientHistory { requested: Amount, sold: Amount },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Unauthorized: {caller:?} is not the registry admin")]
    Unauthorized { caller: Address },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<CurveError> for LaunchError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidParameters(msg) => LaunchError::InvalidParameters(msg),
            CurveError::ZeroAmount => LaunchError::ZeroAmount,
            CurveError::InsufficientHistory { requested, sold } => {
                LaunchError::InsufficientHistory { requested, sold }
            }
            CurveError::ArithmeticOverflow => LaunchError::ArithmeticOverflow,
            // A zero reserve means the curve left its modeled bounds
            CurveError::DivisionByZero => LaunchError::ArithmeticOverflow,
            CurveError::InvariantViolation(msg) => LaunchError::InvariantViolation(msg),
        }
    }
}

impl From<sled::Error> for LaunchError {
    fn from(err: sled::Error) -> Self {
        LaunchError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for LaunchError {
    fn from(err: bincode::Error) -> Self {
        LaunchError::Storage(err.to_string())
    }
}

/// Result type for registry operations
pub type LaunchResult<T> = Result<T, LaunchError>;

/// Helper for reporting a basis-point fee above its cap
pub(crate) fn bps_too_high(field: &'static str, value: Bps, cap: Bps) -> LaunchError {
    LaunchError::FeeTooHigh {
        field,
        value: Amount::from(value),
        cap: Amount::from(cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_errors_map_onto_launch_errors() {
        assert_eq!(
            LaunchError::from(CurveError::ArithmeticOverflow),
            LaunchError::ArithmeticOverflow
        );
        assert_eq!(
            LaunchError::from(CurveError::InsufficientHistory { requested: 5, sold: 2 }),
            LaunchError::InsufficientHistory { requested: 5, sold: 2 }
        );
        assert!(matches!(
            LaunchError::from(CurveError::InvalidParameters("x".into())),
            LaunchError::InvalidParameters(_)
        ));
    }

    #[test]
    fn test_display_messages() {
        let err = LaunchError::InsufficientFee { required: 10, paid: 3 };
        assert_eq!(err.to_string(), "Insufficient launch fee: required 10, paid 3");

        let err = bps_too_high("trading_fee_bps", 600, 500);
        assert_eq!(err.to_string(), "Fee too high: trading_fee_bps = 600 exceeds cap 500");
    }
}
