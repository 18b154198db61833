use thiserror::Error;

/// Failures raised while building the expression graph. Both occur at
/// construction time; differentiating an already-built graph cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// `div` received a denominator node whose value is exactly zero.
    #[error("division by zero in forward evaluation")]
    DivisionByZero,
    /// `log` received an operand outside its domain.
    #[error("log of non-positive value {0}")]
    Domain(f64),
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
