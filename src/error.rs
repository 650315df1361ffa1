//! Error types for the simulation and evaluation harness.
//!
//! There is no recoverable-error taxonomy inside the sim itself: collisions,
//! lifetime expiry and tick-budget exhaustion are all normal state
//! transitions. Errors exist only for contract violations, which are
//! rejected up front instead of being silently clamped.

use std::fmt;

/// Result type for simulation and evaluation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Contract violations surfaced by `World` construction and the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A deployment configuration value is out of range.
    InvalidConfig {
        param: &'static str,
        message: String,
    },
    /// A controller returned the wrong number of outputs.
    OutputArityMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { param, message } => {
                write!(f, "invalid configuration for '{}': {}", param, message)
            }
            Self::OutputArityMismatch { expected, actual } => {
                write!(
                    f,
                    "controller output arity mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SimError {}
