//! Character classification for keypad expressions.
//!
//! Decides which characters a keypad expression may contain and splits the
//! buffer into the pieces the editor needs (trailing operator, current
//! numeric token).

use super::error::EvalError;
use lazy_static::lazy_static;
use regex::Regex;

/// Binary operators a keypad can produce.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

lazy_static! {
    /// Matches strings made only of keypad characters.
    /// Allows: digits, operators, parentheses, dots, whitespace.
    static ref KEYPAD_CHARS: Regex = Regex::new(r"^[0-9+\-*/().\s]+$").unwrap();
}

/// Check that `input` consists only of keypad characters.
///
/// Reports the first offending character and its char index.
pub fn validate_expression(input: &str) -> Result<(), EvalError> {
    if KEYPAD_CHARS.is_match(input) {
        return Ok(());
    }

    match input
        .chars()
        .enumerate()
        .find(|&(_, c)| !is_keypad_char(c))
    {
        Some((position, ch)) => Err(EvalError::InvalidCharacter { ch, position }),
        None => Err(EvalError::malformed("empty expression", None)),
    }
}

/// Whether `c` belongs to the keypad alphabet (whitespace included).
pub fn is_keypad_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '(' || c == ')' || c.is_whitespace() || is_operator(c)
}

/// Whether `c` is one of `+ - * /`.
pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Whether `c` separates numeric tokens (an operator or a parenthesis).
pub fn is_token_boundary(c: char) -> bool {
    is_operator(c) || c == '(' || c == ')'
}

/// Whether the last character of `input` is an operator.
pub fn ends_with_operator(input: &str) -> bool {
    input.chars().next_back().is_some_and(is_operator)
}

/// The numeric token currently being typed: everything after the last
/// operator or parenthesis, or the whole input if there is none.
pub fn current_number_token(input: &str) -> &str {
    match input.rfind(is_token_boundary) {
        // Boundaries are single-byte ASCII.
        Some(idx) => &input[idx + 1..],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_expressions_accepted() {
        assert!(validate_expression("1+2").is_ok());
        assert!(validate_expression("(2.5 * 3) / -4").is_ok());
        assert!(validate_expression("5*(2").is_ok());
        assert!(validate_expression(")(").is_ok());
    }

    #[test]
    fn test_foreign_characters_rejected() {
        assert_eq!(
            validate_expression("Infinity+1"),
            Err(EvalError::InvalidCharacter {
                ch: 'I',
                position: 0
            })
        );
        assert_eq!(
            validate_expression("1e+21"),
            Err(EvalError::InvalidCharacter {
                ch: 'e',
                position: 1
            })
        );
        assert_eq!(
            validate_expression("2^8"),
            Err(EvalError::InvalidCharacter {
                ch: '^',
                position: 1
            })
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            validate_expression(""),
            Err(EvalError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_current_number_token() {
        assert_eq!(current_number_token(""), "");
        assert_eq!(current_number_token("12.5"), "12.5");
        assert_eq!(current_number_token("1.5+2"), "2");
        assert_eq!(current_number_token("3*(4."), "4.");
        assert_eq!(current_number_token("(1.2)"), "");
        assert_eq!(current_number_token("7-"), "");
    }

    #[test]
    fn test_ends_with_operator() {
        assert!(!ends_with_operator(""));
        assert!(!ends_with_operator("12"));
        assert!(ends_with_operator("12/"));
        assert!(ends_with_operator("-"));
        assert!(!ends_with_operator("(1+2)"));
    }
}
