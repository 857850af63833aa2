//! # Introduction
//!
//! toyc is the front end for a small C-like teaching language. It scans source
//! text into tokens and recognizes the grammar with a recursive descent
//! parser, reporting every consumed token and every matched production as an
//! ordered trace.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Trace sink
//!                             ↕
//!                      Function table
//! ```
//!
//! 1. [`parser::lexer`]: classifies characters into [`parser::lexer::Token`]s;
//!    never fails, unknown characters become `UNKNOWN` tokens.
//! 2. [`parser::parse`]: walks the tokens once, left to right, and reports
//!    to a [`parser::trace::TraceSink`]. Function headers are recorded in a
//!    [`parser::signatures::FunctionTable`] so later call sites can be told
//!    apart from variable references.
//! 3. [`parser::trace`]: production labels (course or plain spelling), an
//!    in-memory recorder and a line writer.
//!
//! Parsing stops at the first syntax error; see [`parser::error::ParseError`].
//!
//! ```
//! use toyc::parser::trace::{LabelStyle, TraceRecorder};
//!
//! let mut sink = TraceRecorder::new();
//! let functions = toyc::analyze("void main() { ; }", &mut sink).unwrap();
//!
//! assert!(functions.is_empty());
//! assert_eq!(sink.lines(LabelStyle::Plain).last().unwrap(), "<program>");
//! ```

pub mod parser;

use parser::error::ParseError;
use parser::parse::Parser;
use parser::signatures::FunctionTable;
use parser::trace::TraceSink;

/// Lex and parse `source`, reporting into `sink`.
///
/// Returns the functions defined by the program. On error, whatever was
/// reported before the failure stays in the sink.
pub fn analyze(
    source: &str,
    sink: &mut dyn TraceSink,
) -> Result<FunctionTable, ParseError> {
    let mut parser = Parser::new(source, sink);
    parser.parse_program()?;
    Ok(parser.into_functions())
}
