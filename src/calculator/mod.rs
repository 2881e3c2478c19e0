//! Calculator core: the keypad expression editor and its evaluator.
//!
//! This module provides functionality to:
//! - Edit an expression one keypad command at a time
//! - Validate that an expression only holds keypad characters
//! - Evaluate expressions with a small recursive-descent parser

mod detection;
mod editor;
mod error;
mod evaluation;

pub use detection::{current_number_token, is_operator, validate_expression};
pub use editor::{EMPTY_DISPLAY, Editor, Outcome};
pub use error::EvalError;
pub use evaluation::{Evaluation, MAX_NESTING, evaluate_expression, format_number};
