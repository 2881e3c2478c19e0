//! Keypad commands and the tables that produce them.
//!
//! Two producers feed the calculator: key presses (named like browser
//! `KeyboardEvent.key` values) and button activations (a button carries
//! either a `value` such as `"7"` or an `action` such as `"equals"`).
//! Both are translated into a [`Command`] here.

use std::fmt;

/// A binary operator on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Parse an operator symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// The character this operator is written as in an expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Binding strength: `*` and `/` bind tighter than `+` and `-`.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }

    /// Apply the operator with IEEE-754 semantics.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single edit command for the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// A digit key, `0..=9`.
    Digit(u8),
    /// The decimal point.
    Point,
    /// One of `+ - * /`.
    Operator(Operator),
    /// The context-sensitive parenthesis key.
    ToggleParen,
    /// Remove the last character.
    Delete,
    /// Reset the expression.
    Clear,
    /// Evaluate the expression.
    Evaluate,
}

impl Command {
    /// Translate a key name into a command.
    ///
    /// Key names follow `KeyboardEvent.key`: single characters for printable
    /// keys, `Enter`, `Backspace` and `Escape` for the control keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => return Some(Self::Evaluate),
            "Backspace" => return Some(Self::Delete),
            "Escape" => return Some(Self::Clear),
            _ => {}
        }

        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }

    /// Translate a button activation into a command.
    ///
    /// `action` takes priority over `value`, matching buttons that carry
    /// both attributes.
    pub fn from_button(value: Option<&str>, action: Option<&str>) -> Option<Self> {
        if let Some(action) = action {
            match action {
                "clear" => return Some(Self::Clear),
                "delete" => return Some(Self::Delete),
                "paren" => return Some(Self::ToggleParen),
                "equals" => return Some(Self::Evaluate),
                _ => {}
            }
        }
        value.filter(|v| !v.is_empty()).and_then(Self::from_key)
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            '.' => Some(Self::Point),
            '(' | ')' => Some(Self::ToggleParen),
            '=' => Some(Self::Evaluate),
            _ => Operator::from_char(c).map(Self::Operator),
        }
    }

    /// Whether this command only edits the buffer (everything but evaluate).
    pub fn is_edit(self) -> bool {
        !matches!(self, Self::Evaluate)
    }
}

/// Split a line of input into key names.
///
/// Whitespace-separated words that name a control key (`Enter`, `Backspace`,
/// `Escape`) are kept whole; every other word is split into single-character
/// keys, so `"12+3 Enter"` yields `1`, `2`, `+`, `3`, `Enter`.
pub fn split_keys(line: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for word in line.split_whitespace() {
        if is_named_key(word) {
            keys.push(word.to_string());
        } else {
            keys.extend(word.chars().map(String::from));
        }
    }
    keys
}

fn is_named_key(word: &str) -> bool {
    matches!(word, "Enter" | "Backspace" | "Escape")
}

/// Parse a line of input into commands, returning unknown keys separately.
pub fn parse_line(line: &str) -> (Vec<Command>, Vec<String>) {
    let mut commands = Vec::new();
    let mut unknown = Vec::new();
    for key in split_keys(line) {
        match Command::from_key(&key) {
            Some(command) => commands.push(command),
            None => unknown.push(key),
        }
    }
    (commands, unknown)
}
