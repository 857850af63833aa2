//! Keyword and operator tables
//!
//! Static spelling → [`TokenKind`] maps consulted by the lexer. Both tables are
//! built once on first use and are read-only afterwards.

use super::lexer::TokenKind;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| {
        FxHashMap::from_iter([
            ("const", TokenKind::Const),
            ("int", TokenKind::Int),
            ("char", TokenKind::Char),
            ("void", TokenKind::Void),
            ("main", TokenKind::Main),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("switch", TokenKind::Switch),
            ("case", TokenKind::Case),
            ("default", TokenKind::Default),
            ("while", TokenKind::While),
            ("for", TokenKind::For),
            ("scanf", TokenKind::Scanf),
            ("printf", TokenKind::Printf),
            ("return", TokenKind::Return),
        ])
    });

static OPERATORS: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| {
        FxHashMap::from_iter([
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            ("<", TokenKind::Lt),
            ("<=", TokenKind::Le),
            (">", TokenKind::Gt),
            (">=", TokenKind::Ge),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::NotEq),
            (":", TokenKind::Colon),
            ("=", TokenKind::Assign),
            (";", TokenKind::Semicolon),
            (",", TokenKind::Comma),
            ("(", TokenKind::LParen),
            (")", TokenKind::RParen),
            ("[", TokenKind::LBracket),
            ("]", TokenKind::RBracket),
            ("{", TokenKind::LBrace),
            ("}", TokenKind::RBrace),
        ])
    });

/// Look up a word in the keyword table, ignoring ASCII case.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
}

/// Look up an operator or punctuation spelling (exact match).
pub fn operator(text: &str) -> Option<TokenKind> {
    OPERATORS.get(text).copied()
}
