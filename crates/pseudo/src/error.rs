//! Error types for selector resolution and extraction
//!
//! Every variant is fatal to the enclosing `resolve`/`extract` call.

use dom::DomError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PseudoError>;

#[derive(Debug, Error)]
pub enum PseudoError {
    #[error("Selector syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Cannot put a pseudo {pseudo} at the start of a query {query}")]
    MissingContext { pseudo: String, query: String },

    #[error("Unknown pseudo selector {pseudo} in {query}")]
    UnknownPseudo { pseudo: String, query: String },

    #[error("Invalid argument for :{pseudo}: {reason}")]
    InvalidArgument { pseudo: String, reason: String },

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid extraction config: {0}")]
    Config(#[from] serde_json::Error),
}

/// A selector the tokenizer refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {position} of {selector:?}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: usize,
    pub selector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("whitespace inside a pseudo argument is not supported")]
    WhitespaceInArgument,

    #[error("nested parenthesis in pseudo arguments")]
    NestedParenthesis,

    #[error("unclosed pseudo argument list")]
    UnclosedParenthesis,
}
