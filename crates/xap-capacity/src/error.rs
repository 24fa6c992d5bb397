//! Error types for capacity arithmetic.

use thiserror::Error;

/// Result type alias for capacity operations.
pub type CapacityResult<T> = Result<T, CapacityError>;

/// Errors raised when capacity values or maps would become invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("invalid cpu cores value: {0}")]
    InvalidCpu(String),

    #[error("capacity overflow: {lhs} + {rhs}")]
    Overflow { lhs: String, rhs: String },

    #[error("agent {agent}: cannot subtract {subtrahend} from {minuend}")]
    NegativeForAgent {
        agent: String,
        minuend: String,
        subtrahend: String,
    },
}
