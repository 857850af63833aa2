//! Declaration parsing implementation
//!
//! This module handles the declaration side of toy-C programs:
//!
//! - Constant declarations: `const int a = 1, b = -2;`
//! - Variable declarations, including array initializers
//! - Function definitions and the `main` function
//!
//! # Grammar
//!
//! ```text
//! program       ::= [const_decl] [var_decl] { function_def } main_function
//! const_decl    ::= "const" const_def ";" { "const" const_def ";" }
//! var_decl      ::= var_def ";" { var_def ";" }
//! var_def       ::= type declarator { "," declarator }
//!                 | type declarator "=" initializer
//! declarator    ::= identifier [ "[" unsigned "]" [ "[" unsigned "]" ] ]
//! function_def  ::= ("int" | "char" | "void") identifier "(" params ")" "{" compound "}"
//! main_function ::= ("int" | "void") "main" "(" ")" "{" compound "}"
//! compound      ::= [const_decl] [var_decl] statement_list
//! ```
//!
//! `type identifier` opens both a variable definition and a function
//! definition, so the choice is made by peeking at the token after the name:
//! a `(` there means a function header.

use crate::parser::error::ParseError;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::trace::Production;

/// Array rank supported by declarations and element references
pub(crate) const MAX_ARRAY_RANK: usize = 2;

impl Parser<'_> {
    pub(crate) fn parse_program_body(&mut self) -> Result<(), ParseError> {
        if self.check(TokenKind::Const) {
            self.parse_constant_declaration()?;
        }
        if self.at_variable_declaration() {
            self.parse_variable_declaration()?;
        }

        loop {
            match self.peek_kind() {
                TokenKind::Int | TokenKind::Char | TokenKind::Void
                    if self.kind_at(1) == TokenKind::Main =>
                {
                    self.parse_main_function()?;
                    break;
                }
                TokenKind::Int | TokenKind::Char | TokenKind::Void => {
                    self.parse_function_definition()?;
                }
                _ => return Err(self.unexpected("function definition")),
            }
        }

        if !self.is_at_end() {
            return Err(self.unexpected("end of input after the main function"));
        }

        self.emit(Production::Program);
        Ok(())
    }

    /// `int`/`char` followed by something other than `name (`.
    pub(crate) fn at_variable_declaration(&self) -> bool {
        self.peek_kind().is_type_keyword() && self.kind_at(2) != TokenKind::LParen
    }

    /// Parse constant declarations: one or more `const ... ;`
    pub(crate) fn parse_constant_declaration(&mut self) -> Result<(), ParseError> {
        loop {
            self.expect(TokenKind::Const, "'const'")?;
            self.parse_constant_definition()?;
            self.expect_semicolon("after constant definition")?;

            if !self.check(TokenKind::Const) {
                break;
            }
        }

        self.emit(Production::ConstantDeclaration);
        Ok(())
    }

    /// Parse `int a = 1, b = 2` or `char c = 'x', d = 'y'`
    fn parse_constant_definition(&mut self) -> Result<(), ParseError> {
        let ty = self.expect_where(TokenKind::is_type_keyword, "'int' or 'char'")?;

        loop {
            self.expect_identifier("constant name")?;
            self.expect(TokenKind::Assign, "'=' after constant name")?;

            if ty.kind == TokenKind::Int {
                if !self.at_integer() {
                    return Err(self.unexpected("integer constant"));
                }
                self.parse_integer()?;
            } else {
                self.expect(TokenKind::CharLiteral, "character constant")?;
            }

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance("','")?;
        }

        self.emit(Production::ConstantDefinition);
        Ok(())
    }

    /// Parse variable definitions for as long as the next tokens look like one.
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<(), ParseError> {
        while self.at_variable_declaration() {
            self.parse_variable_definition()?;
            self.expect_semicolon("after variable definition")?;
        }

        self.emit(Production::VariableDeclaration);
        Ok(())
    }

    /// Parse one variable definition (without the trailing `;`).
    ///
    /// An initialized definition declares exactly one variable; an
    /// uninitialized one may declare several, separated by commas.
    fn parse_variable_definition(&mut self) -> Result<(), ParseError> {
        self.expect_where(TokenKind::is_type_keyword, "'int' or 'char'")?;

        let dims = self.parse_declarator()?;

        let form = if self.check(TokenKind::Assign) {
            self.advance("'='")?;
            if dims.is_empty() {
                self.parse_constant()?;
            } else {
                self.parse_array_initializer(&dims)?;
            }
            Production::InitializedDefinition
        } else {
            while self.check(TokenKind::Comma) {
                self.advance("','")?;
                self.parse_declarator()?;
            }
            Production::UninitializedDefinition
        };

        self.emit(form);
        self.emit(Production::VariableDefinition);
        Ok(())
    }

    /// Parse `name[d1][d2]`, returning the dimension list.
    fn parse_declarator(&mut self) -> Result<Vec<u64>, ParseError> {
        self.expect_identifier("variable name")?;

        let mut dims = Vec::new();
        while dims.len() < MAX_ARRAY_RANK && self.check(TokenKind::LBracket) {
            self.advance("'['")?;
            if !self.check(TokenKind::IntegerLiteral) {
                return Err(self.unexpected("unsigned integer array size"));
            }
            let line = self.peek().line();
            let size = self.parse_unsigned_integer()?.ok_or_else(|| {
                ParseError::UnexpectedToken {
                    expected: "array size that fits in 64 bits".to_string(),
                    found: "oversized integer".to_string(),
                    line,
                }
            })?;
            dims.push(size);
            self.expect(TokenKind::RBracket, "']' after array size")?;
        }

        Ok(dims)
    }

    /// Flat-counted array initializer.
    ///
    /// Braces and commas pass through as plain tokens; each scalar constant
    /// counts down from the product of the dimensions. Once the count reaches
    /// zero, one `}` per dimension closes the initializer. Brace nesting is not
    /// otherwise checked.
    fn parse_array_initializer(&mut self, dims: &[u64]) -> Result<(), ParseError> {
        let line = self.peek().line();
        let mut remaining = dims
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| ParseError::UnexpectedToken {
                expected: "array with at most u64::MAX elements".to_string(),
                found: format!("dimensions {dims:?}"),
                line,
            })?;
        tracing::trace!(?dims, elements = remaining, "array initializer");

        while remaining > 0 {
            match self.peek_kind() {
                TokenKind::LBrace | TokenKind::RBrace | TokenKind::Comma => {
                    self.advance("array initializer")?;
                }
                _ if self.at_integer() || self.check(TokenKind::CharLiteral) => {
                    self.parse_constant()?;
                    remaining -= 1;
                }
                _ => return Err(self.unexpected("array initializer element")),
            }
        }

        for _ in dims {
            self.expect_rbrace("closing array initializer")?;
        }
        Ok(())
    }

    /// Parse `int f(...) {...}`, `char f(...) {...}` or `void f(...) {...}`.
    ///
    /// The signature is recorded as soon as the name is read, so calls inside
    /// the body (recursion) resolve.
    pub(crate) fn parse_function_definition(&mut self) -> Result<(), ParseError> {
        let returns_value = match self.peek_kind() {
            TokenKind::Int | TokenKind::Char => true,
            TokenKind::Void => false,
            _ => return Err(self.unexpected("function return type")),
        };
        self.advance("function return type")?;

        let name = self.expect_identifier("function name")?;
        self.functions.declare(&name.text, returns_value, name.line())?;
        if returns_value {
            self.emit(Production::DeclarationHeader);
        }

        self.expect_lparen("after function name")?;
        self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;
        self.expect_lbrace("before function body")?;
        self.parse_compound_statement()?;
        self.expect_rbrace("after function body")?;

        self.emit(if returns_value {
            Production::ValueFunctionDefinition
        } else {
            Production::VoidFunctionDefinition
        });
        Ok(())
    }

    /// Parse parameter list: `type name, type name, ...` (possibly empty)
    fn parse_parameter_list(&mut self) -> Result<(), ParseError> {
        if !self.check(TokenKind::RParen) {
            loop {
                self.expect_where(TokenKind::is_type_keyword, "parameter type")?;
                self.expect_identifier("parameter name")?;

                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance("','")?;
            }
        }

        self.emit(Production::ParameterList);
        Ok(())
    }

    /// Parse the entry function. It takes no parameters and reports no
    /// parameter list.
    pub(crate) fn parse_main_function(&mut self) -> Result<(), ParseError> {
        self.expect_where(
            |kind| matches!(kind, TokenKind::Int | TokenKind::Void),
            "'int' or 'void' before main",
        )?;
        self.expect(TokenKind::Main, "'main'")?;
        self.expect_lparen("after main")?;
        self.expect_rparen("after main(")?;
        self.expect_lbrace("before main body")?;
        self.parse_compound_statement()?;
        self.expect_rbrace("after main body")?;

        self.emit(Production::MainFunction);
        Ok(())
    }

    /// Parse a function body (without its braces).
    fn parse_compound_statement(&mut self) -> Result<(), ParseError> {
        if self.check(TokenKind::Const) {
            self.parse_constant_declaration()?;
        }
        if self.at_variable_declaration() {
            self.parse_variable_declaration()?;
        }
        self.parse_statement_list()?;

        self.emit(Production::CompoundStatement);
        Ok(())
    }
}
