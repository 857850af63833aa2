//! Toy-C front end
//!
//! This module turns toy-C source text into a trace of tokens and matched
//! grammar productions:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`keywords`]: Keyword and operator tables used by the lexer
//! - [`parse`]: The [`Parser`](parse::Parser) and its cursor helpers
//! - [`signatures`]: Function table used to recognize call sites
//! - [`trace`]: Production labels and trace sinks
//! - [`error`]: Fatal parse errors
//!
//! # Supported language
//!
//! - Types: `int`, `char` (and `void` for functions), arrays of rank ≤ 2
//! - Declarations: `const` constants, variables with optional initializers,
//!   functions, and a final `main`
//! - Statements: assignment, `if`/`else`, `while`, a restricted `for`,
//!   `switch`/`case`/`default`, `scanf`, `printf`, `return`, calls, blocks
//! - Expressions: `+ - * /` over integers, characters, variables, array
//!   elements and calls; conditions are a single relational comparison
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per non-terminal.
//! No external parser generator dependencies.

mod declarations;
pub mod error;
mod expressions;
pub mod keywords;
pub mod lexer;
pub mod parse;
pub mod signatures;
mod statements;
pub mod trace;

#[cfg(test)]
mod lexer_property_tests;
