//! Expression evaluation for keypad expressions.
//!
//! A tokenizer and a precedence-climbing parser for the keypad grammar
//! (numbers, `+ - * /`, parentheses, unary signs), evaluated over `f64`.
//!
//! Values are folded while parsing, so a chain like `1+1+…+1` is reduced
//! in a loop. Only parentheses and unary signs add recursion, and those are
//! capped at [`MAX_NESTING`].

use super::detection::validate_expression;
use super::error::EvalError;
use crate::keypad::Operator;
use std::fmt;

/// Deepest nesting of parentheses and unary signs the parser accepts.
pub const MAX_NESTING: usize = 512;

/// A successful evaluation of the editor buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The expression that was evaluated, after auto-closing parentheses.
    pub expression: String,
    /// The numeric value.
    pub value: f64,
    /// The value formatted for the display.
    pub result: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Op(Operator),
    ParenOpen,
    ParenClose,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Op(op) => write!(f, "{op}"),
            Token::ParenOpen => write!(f, "("),
            Token::ParenClose => write!(f, ")"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Spanned {
    token: Token,
    position: usize,
}

/// Split a validated expression into tokens. Positions are char indices.
///
/// Numbers with leading zeros (`007`, `08`) are accepted and read as plain
/// decimals.
fn tokenize(input: &str) -> Result<Vec<Spanned>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => Token::ParenOpen,
            ')' => Token::ParenClose,
            '0'..='9' | '.' => {
                let start = i;
                let mut seen_point = false;
                while i < chars.len() {
                    match chars[i] {
                        '0'..='9' => {}
                        '.' if !seen_point => seen_point = true,
                        _ => break,
                    }
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| {
                    EvalError::malformed(format!("invalid number '{literal}'"), Some(start))
                })?;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    position: start,
                });
                continue;
            }
            c => match Operator::from_char(c) {
                Some(op) => Token::Op(op),
                None => {
                    return Err(EvalError::InvalidCharacter { ch: c, position: i });
                }
            },
        };
        tokens.push(Spanned { token, position: i });
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            end,
        }
    }

    fn peek(&self) -> Option<Spanned> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.parse_binary(1)?;
        match self.next() {
            None => Ok(value),
            Some(extra) => Err(EvalError::malformed(
                format!("unexpected '{}'", extra.token),
                Some(extra.position),
            )),
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<f64, EvalError> {
        let mut lhs = self.parse_unary()?;

        while let Some(Spanned {
            token: Token::Op(op),
            ..
        }) = self.peek()
        {
            if op.precedence() < min_precedence {
                break;
            }
            self.next();
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = op.apply(lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Spanned {
                token: Token::Op(op @ (Operator::Add | Operator::Subtract)),
                position,
            }) => {
                self.next();
                self.enter(position)?;
                let operand = self.parse_unary();
                self.depth -= 1;
                let operand = operand?;
                Ok(match op {
                    Operator::Subtract => -operand,
                    _ => operand,
                })
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<f64, EvalError> {
        let Some(Spanned { token, position }) = self.next() else {
            return Err(EvalError::malformed(
                "unexpected end of expression",
                Some(self.end),
            ));
        };

        match token {
            Token::Number(n) => Ok(n),
            Token::ParenOpen => {
                self.enter(position)?;
                let inner = self.parse_binary(1);
                self.depth -= 1;
                let inner = inner?;
                match self.next() {
                    Some(Spanned {
                        token: Token::ParenClose,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(EvalError::malformed(
                        format!("expected ')' but found '{}'", other.token),
                        Some(other.position),
                    )),
                    None => Err(EvalError::malformed("missing ')'", Some(self.end))),
                }
            }
            other => Err(EvalError::malformed(
                format!("unexpected '{other}'"),
                Some(position),
            )),
        }
    }

    fn enter(&mut self, position: usize) -> Result<(), EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::malformed(
                "expression nested too deeply",
                Some(position),
            ));
        }
        self.depth += 1;
        Ok(())
    }
}

/// Validate, parse and evaluate a keypad expression.
///
/// Division by zero is not an error: it yields an infinity or NaN.
pub fn evaluate_expression(input: &str) -> Result<f64, EvalError> {
    validate_expression(input)?;
    let tokens = tokenize(input)?;
    let value = Parser::new(&tokens, input.chars().count()).parse()?;
    tracing::trace!(tokens = tokens.len(), value, "evaluated expression");
    Ok(value)
}

/// Format a value the way the display shows it.
///
/// Plain decimal for ordinary magnitudes, exponent notation with an explicit
/// sign for very large or very small ones, and `Infinity` / `NaN` for
/// non-finite values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let s = if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        return s.to_string();
    }
    if value == 0.0 {
        // Also covers -0.
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{value}");
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> f64 {
        evaluate_expression(input).unwrap()
    }

    fn is_malformed(input: &str) -> bool {
        matches!(
            evaluate_expression(input),
            Err(EvalError::MalformedExpression { .. })
        )
    }

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(eval("2+2"), 4.0);
        assert_eq!(eval("1.5*4"), 6.0);
        assert_eq!(eval("7"), 7.0);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3"), 7.0);
        assert_eq!(eval("10-6/2"), 7.0);
        assert_eq!(eval("(1+2)*3"), 9.0);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("8-3-2"), 3.0);
        assert_eq!(eval("8/4/2"), 1.0);
        assert_eq!(eval("2*3/4"), 1.5);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval("-5"), -5.0);
        assert_eq!(eval("-5+3"), -2.0);
        assert_eq!(eval("(-2)*3"), -6.0);
        assert_eq!(eval("(+2)"), 2.0);
        assert_eq!(eval("-(2+3)"), -5.0);
        assert_eq!(eval("--5"), 5.0);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(eval(".5+.5"), 1.0);
        assert_eq!(eval("5.*2"), 10.0);
        assert_eq!(eval("007+1"), 8.0);
        assert_eq!(eval(" 1 + 2 "), 3.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1/0"), f64::INFINITY);
        assert_eq!(eval("-1/0"), f64::NEG_INFINITY);
        assert!(eval("0/0").is_nan());
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(is_malformed("1+"));
        assert!(is_malformed("*2"));
        assert!(is_malformed("()"));
        assert!(is_malformed("(2)(3)"));
        assert!(is_malformed("(1+2"));
        assert!(is_malformed("1+2)"));
        assert!(is_malformed("."));
        assert!(is_malformed("1.2.3"));
        assert!(is_malformed("5.(2)"));
    }

    #[test]
    fn test_error_positions() {
        assert_eq!(
            evaluate_expression("1+"),
            Err(EvalError::MalformedExpression {
                reason: "unexpected end of expression".to_string(),
                position: Some(2),
            })
        );
        assert_eq!(
            evaluate_expression("1+2)"),
            Err(EvalError::MalformedExpression {
                reason: "unexpected ')'".to_string(),
                position: Some(3),
            })
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(
            evaluate_expression("Infinity*2"),
            Err(EvalError::InvalidCharacter { ch: 'I', .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(eval(&ok), 1.0);

        let deep = format!(
            "{}1{}",
            "(".repeat(MAX_NESTING + 1),
            ")".repeat(MAX_NESTING + 1)
        );
        assert!(is_malformed(&deep));
        assert!(is_malformed(&"-".repeat(MAX_NESTING + 1)));
    }

    #[test]
    fn test_long_chains_fold_iteratively() {
        let sum = format!("1{}", "+1".repeat(200_000));
        assert_eq!(eval(&sum), 200_001.0);

        let product = format!("2{}", "*1".repeat(200_000));
        assert_eq!(eval(&product), 2.0);

        let mixed = format!("{}0", "1*2+".repeat(100_000));
        assert_eq!(eval(&mixed), 200_000.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e22), "-1.5e+22");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }
}
