//! # Error Types
//!
//! Term errors are first-class: a string that does not parse, or a
//! reduction that does not terminate within its budget, is reported as a
//! value so that callers composing many candidate terms can drop the bad
//! ones and keep going.

use thiserror::Error;

/// Errors raised while parsing or reducing lambda terms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TermError {
    /// A token appeared where the grammar does not allow it.
    #[error("Unexpected token '{found}' at position {position} in '{input}'")]
    UnexpectedToken {
        found: String,
        position: usize,
        input: String,
    },

    /// The input ended in the middle of an expression.
    #[error("Unexpected end of input in '{input}'")]
    UnexpectedEnd { input: String },

    /// A complete expression was read but input remains.
    #[error("Trailing input at position {position} in '{input}'")]
    TrailingInput { position: usize, input: String },

    /// Lambda and existential binders must name variables, not constants.
    #[error("Cannot bind '{name}': binders must be variables")]
    InvalidBinder { name: String },

    /// Beta reduction exceeded its step budget.
    #[error("Reduction did not reach normal form within {limit} steps")]
    ReductionLimit { limit: usize },
}
