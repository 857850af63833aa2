//! Property-based tests for the lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated inputs:
//!
//! 1. **Lexer never panics**: arbitrary input always produces tokens
//! 2. **EOF is always last**: exactly one `Eof`, at the end
//! 3. **Lexer is deterministic**: same input always produces same tokens
//! 4. **Round trip**: re-lexing the spelled-out tokens gives the same kinds and texts
//! 5. **Keyword case**: any casing of a keyword lexes to the keyword, text unchanged

use proptest::prelude::*;

use super::lexer::{Lexer, Token, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Single-token fragments that classify unambiguously on their own.
const SINGLE_TOKENS: &[&str] = &[
    "x", "count", "_tmp", "a1", "42", "0", "'a'", "'+'", "\"hi there\"",
    "\"%d\"", "int", "char", "void", "const", "main", "if", "else", "while",
    "for", "switch", "case", "default", "scanf", "printf", "return", "+",
    "-", "*", "/", "<", "<=", ">", ">=", "==", "!=", "=", ":", ";", ",", "(",
    ")", "[", "]", "{", "}", "&", "#", "!",
];

const KEYWORDS: &[&str] = &[
    "const", "int", "char", "void", "main", "if", "else", "switch", "case",
    "default", "while", "for", "scanf", "printf", "return",
];

fn single_token() -> impl Strategy<Value = String> {
    prop::sample::select(SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn token_sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(single_token(), 0..24)
}

/// A keyword with each letter's case chosen at random.
fn mixed_case_keyword() -> impl Strategy<Value = String> {
    (prop::sample::select(KEYWORDS), prop::collection::vec(any::<bool>(), 8))
        .prop_map(|(word, upper)| {
            word.chars()
                .zip(upper.into_iter().cycle())
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
}

fn kinds_and_texts(tokens: &[Token]) -> Vec<(TokenKind, String)> {
    tokens.iter().map(|t| (t.kind, t.text.clone())).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn lexer_never_panics(input in any::<String>()) {
        let _ = Lexer::new(&input).tokenize();
    }

    #[test]
    fn eof_is_always_last(input in any::<String>()) {
        let tokens = Lexer::new(&input).tokenize();
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn lexer_is_deterministic(input in "[ -~\n\t]{0,80}") {
        prop_assert_eq!(Lexer::new(&input).tokenize(), Lexer::new(&input).tokenize());
    }

    #[test]
    fn single_tokens_round_trip(parts in token_sequence()) {
        let source = parts.join(" ");
        let first = Lexer::new(&source).tokenize();
        // One token per fragment, plus the end marker.
        prop_assert_eq!(first.len(), parts.len() + 1);

        let respelled: Vec<String> = first.iter().map(Token::source_text).collect();
        let second = Lexer::new(&respelled.join(" ")).tokenize();
        prop_assert_eq!(kinds_and_texts(&first), kinds_and_texts(&second));
    }

    #[test]
    fn keywords_ignore_case(word in mixed_case_keyword()) {
        let tokens = Lexer::new(&word).tokenize();
        let expected = super::keywords::keyword(&word.to_ascii_lowercase());
        prop_assert_eq!(Some(tokens[0].kind), expected);
        prop_assert_eq!(&tokens[0].text, &word);
    }
}
