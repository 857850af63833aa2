//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and its cursor helpers.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent recognizer with one method per
//! non-terminal:
//! - This module: Parser struct, cursor helpers, and the entry point
//! - `declarations`: program, constant/variable declarations, functions
//! - `statements`: statement forms
//! - `expressions`: expressions, conditions, constants and integers
//!
//! Recognizers do not build a tree. Each consumed token and each completed
//! production is reported to a [`TraceSink`] as it happens.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Two decisions need more than the current token. Declarations look two
//! tokens ahead (`type name (` starts a function), and an identifier is a call
//! exactly when it names a function recorded earlier in the
//! [`FunctionTable`]. Lookahead only reads; nothing is consumed or emitted
//! until a branch is chosen.

use crate::parser::error::ParseError;
use crate::parser::lexer::{Lexer, SourceLocation, Token, TokenKind};
use crate::parser::signatures::FunctionTable;
use crate::parser::trace::{Production, TraceSink};

/// Combined depth of nested statements and expressions before parsing fails
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent recognizer for toy-C
pub struct Parser<'s> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) functions: FunctionTable,
    sink: &'s mut dyn TraceSink,
    eof: Token,
    nesting_depth: usize,
}

impl<'s> Parser<'s> {
    /// Lex `source` and prepare to parse it, reporting into `sink`.
    pub fn new(source: &str, sink: &'s mut dyn TraceSink) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize(), sink)
    }

    /// Parse an already-lexed token sequence. A trailing `Eof` token is
    /// optional; reading past the end always yields one.
    pub fn from_tokens(
        mut tokens: Vec<Token>,
        sink: &'s mut dyn TraceSink,
    ) -> Self {
        let trailing_eof = tokens
            .last()
            .is_some_and(|last| last.kind == TokenKind::Eof);
        let eof = match trailing_eof.then(|| tokens.pop()).flatten() {
            Some(eof) => eof,
            None => {
                let loc = tokens
                    .last()
                    .map_or(SourceLocation::new(1, 1), |last| last.location);
                Token::new(TokenKind::Eof, "", loc)
            }
        };

        Self {
            tokens,
            position: 0,
            functions: FunctionTable::new(),
            sink,
            eof,
            nesting_depth: 0,
        }
    }

    /// Parse the entire program.
    ///
    /// On error the trace already written stays in the sink; the function
    /// table keeps whatever was recorded before the failure.
    pub fn parse_program(&mut self) -> Result<(), ParseError> {
        let result = self.parse_program_body();
        match &result {
            Ok(()) => tracing::debug!(
                tokens = self.tokens.len(),
                functions = self.functions.len(),
                "parse complete"
            ),
            Err(err) => tracing::debug!(error = %err, "parse failed"),
        }
        result
    }

    /// Signatures recorded so far
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn into_functions(self) -> FunctionTable {
        self.functions
    }

    /// Cursor position (index of the next unconsumed token)
    pub fn position(&self) -> usize {
        self.position
    }

    // ===== Helper methods =====

    /// Current token; the end marker once every token is consumed.
    pub(crate) fn peek(&self) -> &Token {
        self.peek_ahead(0)
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Token `n` positions past the cursor, without consuming anything.
    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        self.tokens.get(self.position + n).unwrap_or(&self.eof)
    }

    pub(crate) fn kind_at(&self, n: usize) -> TokenKind {
        self.peek_ahead(n).kind
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The current identifier names a function recorded earlier.
    pub(crate) fn at_function_call(&self) -> bool {
        self.check(TokenKind::Identifier)
            && self.functions.contains(&self.peek().text)
    }

    /// Consume the current token and report it.
    pub(crate) fn advance(&mut self, expected: &str) -> Result<Token, ParseError> {
        if self.is_at_end() {
            return Err(ParseError::unexpected(&self.eof, expected));
        }
        let token = self.tokens[self.position].clone();
        self.position += 1;
        tracing::trace!(kind = %token.kind, text = %token.text, "token");
        self.sink.token(&token);
        Ok(token)
    }

    /// Consume a token of `kind`, or fail naming `expected`.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance(expected)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume a token whose kind satisfies `accept`.
    pub(crate) fn expect_where(
        &mut self,
        accept: impl Fn(TokenKind) -> bool,
        expected: &str,
    ) -> Result<Token, ParseError> {
        if accept(self.peek_kind()) {
            self.advance(expected)
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::Identifier, what)
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::LParen, &format!("'(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::RParen, &format!("')' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::LBrace, &format!("'{{' {ctx}"))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::RBrace, &format!("'}}' {ctx}"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::Semicolon, &format!("';' {ctx}"))
    }

    /// Error for the current token not matching `expected`.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(self.peek(), expected)
    }

    /// Enter a nested statement or expression. Fails once the depth exceeds
    /// [`MAX_NESTING_DEPTH`]; call [`Parser::leave_nesting`] after every
    /// successful entry.
    pub(crate) fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: self.peek().line(),
            });
        }
        self.nesting_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        debug_assert!(self.nesting_depth > 0, "leave_nesting without enter_nesting");
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Report a completed production.
    pub(crate) fn emit(&mut self, production: Production) {
        tracing::trace!(production = production.plain_name(), "matched");
        self.sink.production(production);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::trace::{LabelStyle, TraceRecorder};

    #[test]
    fn test_lookahead_does_not_consume() {
        let mut sink = TraceRecorder::new();
        let parser = Parser::new("int f(", &mut sink);

        assert_eq!(parser.peek_kind(), TokenKind::Int);
        assert_eq!(parser.kind_at(2), TokenKind::LParen);
        assert_eq!(parser.kind_at(2), TokenKind::LParen);
        assert_eq!(parser.kind_at(3), TokenKind::Eof);
        assert_eq!(parser.kind_at(40), TokenKind::Eof);
        assert_eq!(parser.position(), 0);
        drop(parser);

        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_expect_reports_consumed_tokens() {
        let mut sink = TraceRecorder::new();
        let mut parser = Parser::new("x ;", &mut sink);

        parser.expect_identifier("name").unwrap();
        let err = parser.expect_lparen("after name").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "'(' after name".to_string(),
                found: "SEMICN ';'".to_string(),
                line: 1,
            }
        );
        parser.expect_semicolon("after statement").unwrap();
        assert!(parser.is_at_end());

        let err = parser.advance("anything").unwrap_err();
        assert!(matches!(err, ParseError::PrematureEndOfInput { .. }));
        drop(parser);

        assert_eq!(sink.lines(LabelStyle::Course), ["IDENFR x", "SEMICN ;"]);
    }

    #[test]
    fn test_from_tokens_without_eof() {
        let mut tokens = Lexer::new("a\nb").tokenize();
        tokens.pop();
        let mut sink = TraceRecorder::new();
        let mut parser = Parser::from_tokens(tokens, &mut sink);

        parser.advance("a").unwrap();
        parser.advance("b").unwrap();
        assert_eq!(parser.peek_kind(), TokenKind::Eof);
        let err = parser.expect_semicolon("after b").unwrap_err();
        assert_eq!(
            err,
            ParseError::PrematureEndOfInput {
                expected: "';' after b".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_function_table_is_filled_while_parsing() {
        let mut sink = TraceRecorder::new();
        let mut parser = Parser::new("char c() { return ('c'); } void main() { }", &mut sink);
        assert!(parser.functions().is_empty());

        parser.parse_program().unwrap();
        assert_eq!(parser.functions().returns_value("c"), Some(true));
        assert!(!parser.functions().contains("main"));

        let table = parser.into_functions();
        assert_eq!(table.len(), 1);
    }
}
