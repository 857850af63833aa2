//! Parse error types
//!
//! Every error is fatal: the parser stops at the first malformed construct and
//! hands the error back to the caller. Trace output emitted before the error
//! is left in the sink.

use miette::Diagnostic;
use thiserror::Error;

use super::lexer::{Token, TokenKind};

/// Fatal syntax error with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// The current token cannot start any alternative the recognizer has.
    #[error("line {line}: expected {expected}, found {found}")]
    #[diagnostic(code(toyc::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    /// Input ran out while a construct was still open.
    #[error("line {line}: expected {expected}, found end of input")]
    #[diagnostic(
        code(toyc::premature_end),
        help("check for an unbalanced brace or parenthesis")
    )]
    PrematureEndOfInput { expected: String, line: usize },

    /// Statements or expressions nest deeper than the parser allows.
    #[error("line {line}: nesting exceeds the maximum depth of {limit}")]
    #[diagnostic(
        code(toyc::nesting_too_deep),
        help("split deeply nested blocks or parentheses into smaller pieces")
    )]
    NestingTooDeep { limit: usize, line: usize },

    /// A function name was defined twice.
    #[error("line {line}: function '{name}' is already defined on line {first_line}")]
    #[diagnostic(code(toyc::duplicate_function))]
    DuplicateFunction {
        name: String,
        line: usize,
        first_line: usize,
    },
}

impl ParseError {
    /// Build the error for `token` not matching `expected`, choosing
    /// [`ParseError::PrematureEndOfInput`] when the token is the end marker.
    pub fn unexpected(token: &Token, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        if token.kind == TokenKind::Eof {
            ParseError::PrematureEndOfInput {
                expected,
                line: token.line(),
            }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: token.to_string(),
                line: token.line(),
            }
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::PrematureEndOfInput { line, .. }
            | ParseError::NestingTooDeep { line, .. }
            | ParseError::DuplicateFunction { line, .. } => *line,
        }
    }
}
