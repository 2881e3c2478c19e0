//! The expression editor behind the keypad.
//!
//! Owns the expression buffer and the two pieces of state derived from it:
//! whether the buffer ends in an operator, and how many `(` are still
//! waiting for a `)`.

use super::detection::{current_number_token, ends_with_operator, validate_expression};
use super::error::EvalError;
use super::evaluation::{Evaluation, evaluate_expression, format_number};
use crate::keypad::{Command, Operator};

/// Text shown when the buffer is empty.
pub const EMPTY_DISPLAY: &str = "0";

/// What a command did to the editor.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The buffer changed.
    Edited,
    /// The command was not applicable and left the editor untouched.
    Ignored,
    /// The expression was evaluated and replaced by its result.
    Evaluated(Evaluation),
}

/// Keypad expression editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Editor {
    buffer: String,
    trailing_operator: bool,
    open_parens: usize,
}

impl Editor {
    /// Create an editor with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current expression text.
    pub fn expression(&self) -> &str {
        &self.buffer
    }

    /// The text a display should show: the expression, or `"0"` when empty.
    pub fn display_text(&self) -> &str {
        if self.buffer.is_empty() {
            EMPTY_DISPLAY
        } else {
            &self.buffer
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the buffer ends in `+ - * /`.
    pub fn trailing_operator(&self) -> bool {
        self.trailing_operator
    }

    /// Number of `(` still waiting for a `)`.
    pub fn open_parens(&self) -> usize {
        self.open_parens
    }

    /// Apply a keypad command.
    ///
    /// Only [`Command::Evaluate`] can fail.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, EvalError> {
        let edited = match command {
            Command::Digit(d) => self.push_digit(d),
            Command::Point => self.push_point(),
            Command::Operator(op) => self.push_operator(op),
            Command::ToggleParen => self.toggle_paren(),
            Command::Delete => self.delete_one(),
            Command::Clear => self.clear(),
            Command::Evaluate => {
                return Ok(match self.evaluate()? {
                    Some(evaluation) => Outcome::Evaluated(evaluation),
                    None => Outcome::Ignored,
                });
            }
        };

        Ok(if edited {
            Outcome::Edited
        } else {
            Outcome::Ignored
        })
    }

    /// Append a digit or a decimal point.
    ///
    /// Returns `false` without touching the buffer for any other character,
    /// or for a point the current number already has.
    pub fn push_digit_or_point(&mut self, ch: char) -> bool {
        match ch {
            '.' => self.push_point(),
            '0'..='9' => self.push_digit(ch as u8 - b'0'),
            _ => false,
        }
    }

    /// Append a digit `0..=9`.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 {
            return false;
        }
        self.buffer.push(char::from(b'0' + digit));
        self.trailing_operator = false;
        true
    }

    /// Append a decimal point, unless the number being typed already has one.
    pub fn push_point(&mut self) -> bool {
        if current_number_token(&self.buffer).contains('.') {
            return false;
        }
        self.buffer.push('.');
        self.trailing_operator = false;
        true
    }

    /// Append an operator.
    ///
    /// An expression may only open with `-`. Pressing an operator right
    /// after another replaces it, so the buffer never holds two in a row.
    pub fn push_operator(&mut self, op: Operator) -> bool {
        if self.buffer.is_empty() && op != Operator::Subtract {
            return false;
        }

        if self.trailing_operator {
            self.buffer.pop();
        }
        self.buffer.push(op.symbol());
        self.trailing_operator = true;
        true
    }

    /// The single parenthesis key: opens a group where a value is expected,
    /// closes one when a group is pending, and otherwise opens a new group,
    /// multiplying by it when it follows a digit.
    pub fn toggle_paren(&mut self) -> bool {
        if self.buffer.is_empty() || self.trailing_operator {
            self.buffer.push('(');
            self.open_parens += 1;
        } else if self.open_parens > 0 {
            self.buffer.push(')');
            self.open_parens -= 1;
        } else {
            if self.buffer.ends_with(|c: char| c.is_ascii_digit()) {
                self.buffer.push_str("*(");
            } else {
                self.buffer.push('(');
            }
            self.open_parens += 1;
        }
        self.trailing_operator = false;
        true
    }

    /// Remove the last character.
    pub fn delete_one(&mut self) -> bool {
        let Some(removed) = self.buffer.pop() else {
            return false;
        };

        match removed {
            '(' => self.open_parens = self.open_parens.saturating_sub(1),
            ')' => self.open_parens += 1,
            _ => {}
        }
        self.trailing_operator = ends_with_operator(&self.buffer);
        true
    }

    /// Reset to an empty buffer. Returns whether anything was cleared.
    pub fn clear(&mut self) -> bool {
        let had_state = !self.buffer.is_empty() || self.open_parens > 0;
        self.buffer.clear();
        self.trailing_operator = false;
        self.open_parens = 0;
        had_state
    }

    /// Evaluate the buffer and replace it with the result.
    ///
    /// Pending `(` are closed before evaluating. An empty buffer is a no-op
    /// (`Ok(None)`). On failure the editor is left exactly as it was before
    /// the call.
    pub fn evaluate(&mut self) -> Result<Option<Evaluation>, EvalError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        validate_expression(&self.buffer)?;

        let snapshot = self.clone();
        self.close_pending_parens();

        match evaluate_expression(&self.buffer) {
            Ok(value) => {
                let result = format_number(value);
                let expression = std::mem::replace(&mut self.buffer, result.clone());
                self.trailing_operator = false;
                self.open_parens = 0;
                Ok(Some(Evaluation {
                    expression,
                    value,
                    result,
                }))
            }
            Err(err) => {
                *self = snapshot;
                Err(err)
            }
        }
    }

    fn close_pending_parens(&mut self) {
        for _ in 0..self.open_parens {
            self.buffer.push(')');
        }
        self.open_parens = 0;
    }

    /// Recompute the derived state from scratch and compare.
    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let opens = self.buffer.matches('(').count();
        let closes = self.buffer.matches(')').count();
        opens >= closes
            && self.open_parens == opens - closes
            && self.trailing_operator == ends_with_operator(&self.buffer)
    }
}
