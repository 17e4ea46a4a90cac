//! Crate-wide error type.
//!
//! Every fallible public operation returns [`Result`]. Variants mirror the
//! three error kinds the original source distinguishes: a caller contract
//! violation, an out-of-bounds index, and an internal invariant violation.

use thiserror::Error;

/// Errors raised by this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArboriaError {
    /// The caller violated the contract of the called operation: wrong
    /// dimensions, an out-of-range hyperparameter, a non-binary label, a
    /// NaN feature at predict time, an `Undefined` policy variant reaching
    /// `fit`, and similar.
    #[error("{0}")]
    InvalidArgument(String),

    /// An index addressed outside the bounds of its container.
    #[error("{0}")]
    OutOfRange(String),

    /// An internal invariant was violated, or an unimplemented branch was
    /// reached. This indicates a bug in this crate rather than a caller
    /// mistake.
    #[error("{0}")]
    LogicError(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ArboriaError>;

impl ArboriaError {
    pub(crate) fn invalid_argument(component: &str, condition: &str) -> Self {
        ArboriaError::InvalidArgument(format!("{component}: {condition}"))
    }

    pub(crate) fn out_of_range(component: &str, condition: &str) -> Self {
        ArboriaError::OutOfRange(format!("{component}: {condition}"))
    }

    pub(crate) fn logic_error(component: &str, condition: &str) -> Self {
        ArboriaError::LogicError(format!("{component}: {condition}"))
    }
}
