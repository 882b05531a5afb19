//! Pseudo-class argument parsing and coercion

use std::fmt;

/// A single pseudo-class argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoArg {
    Integer(i64),
    Str(String),
}

impl PseudoArg {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PseudoArg::Integer(value) => Some(*value),
            PseudoArg::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PseudoArg::Integer(_) => None,
            PseudoArg::Str(value) => Some(value),
        }
    }
}

impl fmt::Display for PseudoArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoArg::Integer(value) => write!(f, "{}", value),
            PseudoArg::Str(value) => f.write_str(value),
        }
    }
}

/// Coerce one argument token
///
/// The trimmed token becomes an integer iff it is non-empty and made of
/// ASCII digits only. Digit runs too large for `i64` stay strings.
pub fn coerce_arg(token: &str) -> PseudoArg {
    let token = token.trim();
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = token.parse::<i64>() {
            return PseudoArg::Integer(value);
        }
    }
    PseudoArg::Str(token.to_string())
}

/// Split the text between a pseudo's parentheses into arguments
///
/// Tokens are comma separated and trimmed; empty tokens are dropped.
pub fn parse_args(text: &str) -> Vec<PseudoArg> {
    text.split(',')
        .filter(|token| !token.trim().is_empty())
        .map(coerce_arg)
        .collect()
}
