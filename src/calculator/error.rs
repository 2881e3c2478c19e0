//! Errors produced while evaluating a calculator expression.

use thiserror::Error;

/// Why an expression could not be evaluated.
///
/// Both variants are reported to the user as the same error indicator; the
/// distinction only matters for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The expression contains a character outside the keypad alphabet.
    #[error("invalid character '{ch}' at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// The expression is not a well-formed arithmetic expression.
    #[error("malformed expression: {reason}")]
    MalformedExpression {
        reason: String,
        position: Option<usize>,
    },
}

impl EvalError {
    pub(crate) fn malformed(reason: impl Into<String>, position: Option<usize>) -> Self {
        Self::MalformedExpression {
            reason: reason.into(),
            position,
        }
    }
}
