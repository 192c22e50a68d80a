use thiserror::Error;

/// Error types for the compute module.
///
/// The engine is total over well-formed amounts; the only failures are
/// reading a raw numeric input that is not a finite decimal value and an
/// amount too large to store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// Raw input that cannot be canonicalized to a fixed-point amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Amount whose magnitude does not fit a `DECIMAL(15,2)` column
    #[error("Amount out of range: {0} (must stay below 10000000000000)")]
    AmountOutOfRange(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
