//! Lexer (scanner) for toy-C source text
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. Classification never fails: a character the language does not know
//! becomes a [`TokenKind::Unknown`] token and the parser decides whether that
//! is fatal where it appears.
//!
//! The lexer can be driven eagerly with [`Lexer::tokenize`] or lazily through
//! its [`Iterator`] implementation; both yield the same tokens.

use super::keywords;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Closed set of token classes.
///
/// The [`Display`](fmt::Display) impl yields the category code written to the
/// trace (`IDENFR`, `INTTK`, `LPARENT`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    IntegerLiteral,
    CharLiteral,
    StringLiteral,

    // Keywords
    Const,
    Int,
    Char,
    Void,
    Main,
    If,
    Else,
    Switch,
    Case,
    Default,
    While,
    For,
    Scanf,
    Printf,
    Return,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,

    // Punctuation
    Colon,
    Assign,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    Unknown,
    Eof,
}

impl TokenKind {
    /// Category code used in the trace output.
    pub fn code(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENFR",
            TokenKind::IntegerLiteral => "INTCON",
            TokenKind::CharLiteral => "CHARCON",
            TokenKind::StringLiteral => "STRCON",
            TokenKind::Const => "CONSTTK",
            TokenKind::Int => "INTTK",
            TokenKind::Char => "CHARTK",
            TokenKind::Void => "VOIDTK",
            TokenKind::Main => "MAINTK",
            TokenKind::If => "IFTK",
            TokenKind::Else => "ELSETK",
            TokenKind::Switch => "SWITCHTK",
            TokenKind::Case => "CASETK",
            TokenKind::Default => "DEFAULTTK",
            TokenKind::While => "WHILETK",
            TokenKind::For => "FORTK",
            TokenKind::Scanf => "SCANFTK",
            TokenKind::Printf => "PRINTFTK",
            TokenKind::Return => "RETURNTK",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINU",
            TokenKind::Star => "MULT",
            TokenKind::Slash => "DIV",
            TokenKind::Lt => "LSS",
            TokenKind::Le => "LEQ",
            TokenKind::Gt => "GRE",
            TokenKind::Ge => "GEQ",
            TokenKind::EqEq => "EQL",
            TokenKind::NotEq => "NEQ",
            TokenKind::Colon => "COLON",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Semicolon => "SEMICN",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "LPARENT",
            TokenKind::RParen => "RPARENT",
            TokenKind::LBracket => "LBRACK",
            TokenKind::RBracket => "RBRACK",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Eof => "EOF",
        }
    }

    /// `int` or `char`, the only types a variable, constant or parameter may have.
    pub fn is_type_keyword(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Char)
    }

    pub fn is_additive(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Slash)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::EqEq
                | TokenKind::NotEq
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified lexeme.
///
/// `text` keeps the spelling from the source (original case for keywords);
/// char and string literals store their body without the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Spelling that re-lexes to this token (quotes restored on literals).
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::CharLiteral => format!("'{}'", self.text),
            TokenKind::StringLiteral => format!("\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::CharLiteral | TokenKind::StringLiteral => {
                write!(f, "{} {}", self.kind, self.source_text())
            }
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}

/// Scanner over a source string.
///
/// Owns its input and position; the line counter is only used for
/// diagnostics.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Tokenize the entire input. The result always ends with exactly one
    /// [`TokenKind::Eof`] token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let tokens: Vec<Token> = self.by_ref().collect();
        tracing::debug!(count = tokens.len(), "lexed source");
        tokens
    }

    /// Scan the next token, returning an `Eof` token once the input is
    /// exhausted (and on every call after that).
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, "", loc);
        };

        match ch {
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch, loc),
            '0'..='9' => self.integer_literal(ch, loc),
            '\'' => self.char_literal(loc),
            '"' => self.string_literal(loc),
            _ => self.operator(ch, loc),
        }
    }

    /// Identifier or keyword. Keywords are matched case-insensitively but the
    /// token keeps the original spelling.
    fn identifier_or_keyword(
        &mut self,
        first_char: char,
        loc: SourceLocation,
    ) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = keywords::keyword(&ident).unwrap_or(TokenKind::Identifier);
        Token::new(kind, ident, loc)
    }

    /// Unsigned decimal integer (no sign, no hex, no floats)
    fn integer_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::IntegerLiteral, digits, loc)
    }

    /// Character literal: exactly one character of body, no escapes.
    fn char_literal(&mut self, loc: SourceLocation) -> Token {
        let Some(body) = self.advance() else {
            tracing::warn!(line = loc.line, "quote at end of input");
            return Token::new(TokenKind::Unknown, "'", loc);
        };

        if self.peek() == Some('\'') {
            self.advance();
        } else {
            tracing::warn!(
                line = loc.line,
                "character literal is missing its closing quote"
            );
        }

        Token::new(TokenKind::CharLiteral, body.to_string(), loc)
    }

    /// String literal. A backslash keeps the next character verbatim, so an
    /// escaped quote does not terminate the literal.
    fn string_literal(&mut self, loc: SourceLocation) -> Token {
        let mut body = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Token::new(TokenKind::StringLiteral, body, loc),
                '\\' => {
                    body.push(ch);
                    if let Some(escaped) = self.advance() {
                        body.push(escaped);
                    }
                }
                _ => body.push(ch),
            }
        }

        tracing::warn!(line = loc.line, "unterminated string literal");
        Token::new(TokenKind::StringLiteral, body, loc)
    }

    /// Operators and punctuation. `<`, `>`, `=` and `!` absorb a following
    /// `=`; whatever spelling results is looked up in the operator table.
    fn operator(&mut self, ch: char, loc: SourceLocation) -> Token {
        let mut text = String::new();
        text.push(ch);

        if matches!(ch, '<' | '>' | '=' | '!') && self.peek() == Some('=') {
            self.advance();
            text.push('=');
        }

        let kind = keywords::operator(&text).unwrap_or(TokenKind::Unknown);
        if kind == TokenKind::Unknown {
            tracing::debug!(line = loc.line, text = %text, "unknown character");
        }
        Token::new(kind, text, loc)
    }

    /// Skip spaces, tabs, carriage returns and newlines
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token including a single trailing `Eof`, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
