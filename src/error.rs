//! Error types for sketch construction, updates and selection
//!
//! All failures are precondition violations reported to the immediate
//! caller. None of them leave a sketch partially modified.

use thiserror::Error;

/// Result type used by fallible operations in this crate
pub type Result<T> = std::result::Result<T, SketchError>;

/// Errors raised by counters and the order-statistic selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// A construction parameter is outside its valid range
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidConfig {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was supplied
        value: usize,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// A signed update carried a negative weight
    #[error("weight out of range: {0} is negative")]
    NegativeWeight(i64),

    /// The requested rank does not exist in the input sequence
    #[error("rank {k} out of range for sequence of length {len}")]
    SelectionOutOfRange {
        /// Requested zero-indexed rank
        k: usize,
        /// Length of the input sequence
        len: usize,
    },
}

impl SketchError {
    pub(crate) fn invalid_config(
        parameter: &'static str,
        value: usize,
        reason: &'static str,
    ) -> Self {
        SketchError::InvalidConfig {
            parameter,
            value,
            reason,
        }
    }
}
