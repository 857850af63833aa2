//! Expression parsing implementation
//!
//! ```text
//! expression ::= ["+" | "-"] term { ("+" | "-") term }
//! term       ::= factor { ("*" | "/") factor }
//! factor     ::= call | char | integer | "(" expression ")"
//!              | identifier [ "[" expression "]" [ "[" expression "]" ] ]
//! condition  ::= expression relop expression
//! constant   ::= integer | char
//! integer    ::= ["+" | "-"] unsigned
//! ```
//!
//! A sign directly in front of an integer literal inside a factor is part of
//! the `integer` production, not a separate operator.

use crate::parser::declarations::MAX_ARRAY_RANK;
use crate::parser::error::ParseError;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::trace::Production;

/// Where a function call appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallSite {
    /// `f(...);` on its own; any function may be called
    Statement,
    /// Inside an expression; the function must return a value
    Factor,
}

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<(), ParseError> {
        self.enter_nesting()?;
        let result = self.parse_signed_sum();
        self.leave_nesting();
        result
    }

    /// `[+|-] term { (+|-) term }`
    fn parse_signed_sum(&mut self) -> Result<(), ParseError> {
        if self.peek_kind().is_additive() {
            self.advance("sign")?;
        }
        self.parse_term()?;

        while self.peek_kind().is_additive() {
            self.advance("'+' or '-'")?;
            self.parse_term()?;
        }

        self.emit(Production::Expression);
        Ok(())
    }

    /// Parse multiplicative term (`*` `/`)
    fn parse_term(&mut self) -> Result<(), ParseError> {
        self.parse_factor()?;

        while self.peek_kind().is_multiplicative() {
            self.advance("'*' or '/'")?;
            self.parse_factor()?;
        }

        self.emit(Production::Term);
        Ok(())
    }

    /// Parse factor (calls, literals, parenthesized expressions, variables)
    fn parse_factor(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Identifier if self.at_function_call() => {
                self.parse_function_call(CallSite::Factor)?;
            }
            TokenKind::CharLiteral => {
                self.advance("character literal")?;
            }
            _ if self.at_integer() => {
                self.parse_integer()?;
            }
            TokenKind::LParen => {
                self.advance("'('")?;
                self.parse_expression()?;
                self.expect_rparen("after expression")?;
            }
            TokenKind::Identifier => {
                self.advance("identifier")?;
                self.parse_index_suffix()?;
            }
            _ => return Err(self.unexpected("expression")),
        }

        self.emit(Production::Factor);
        Ok(())
    }

    /// Parse up to two `[expr]` suffixes after a variable name.
    pub(crate) fn parse_index_suffix(&mut self) -> Result<(), ParseError> {
        for _ in 0..MAX_ARRAY_RANK {
            if !self.check(TokenKind::LBracket) {
                break;
            }
            self.advance("'['")?;
            self.parse_expression()?;
            self.expect(TokenKind::RBracket, "']' after array index")?;
        }
        Ok(())
    }

    /// Parse `name(args)` for a name already in the function table.
    pub(crate) fn parse_function_call(&mut self, site: CallSite) -> Result<(), ParseError> {
        let returns_value = self.functions.returns_value(&self.peek().text);
        let returns_value = match (returns_value, site) {
            (Some(false), CallSite::Factor) => {
                return Err(self.unexpected("value-returning function call"));
            }
            (Some(returns_value), _) => returns_value,
            (None, _) => return Err(self.unexpected("function name")),
        };

        self.advance("function name")?;
        self.expect_lparen("after function name")?;
        self.parse_value_parameter_list()?;
        self.expect_rparen("after call arguments")?;

        self.emit(if returns_value {
            Production::ValueCall
        } else {
            Production::VoidCall
        });
        Ok(())
    }

    /// Parse argument list: `expr, expr, ...` (possibly empty)
    fn parse_value_parameter_list(&mut self) -> Result<(), ParseError> {
        if !self.check(TokenKind::RParen) {
            self.parse_expression()?;
            while self.check(TokenKind::Comma) {
                self.advance("','")?;
                self.parse_expression()?;
            }
        }

        self.emit(Production::ValueParameterList);
        Ok(())
    }

    /// Parse `expr relop expr`
    pub(crate) fn parse_condition(&mut self) -> Result<(), ParseError> {
        self.parse_expression()?;
        self.expect_where(TokenKind::is_relational, "relational operator")?;
        self.parse_expression()?;

        self.emit(Production::Condition);
        Ok(())
    }

    /// Parse an integer or character constant
    pub(crate) fn parse_constant(&mut self) -> Result<(), ParseError> {
        if self.at_integer() {
            self.parse_integer()?;
        } else if self.check(TokenKind::CharLiteral) {
            self.advance("character constant")?;
        } else {
            return Err(self.unexpected("constant"));
        }

        self.emit(Production::Constant);
        Ok(())
    }

    /// An integer literal, optionally preceded by a sign, starts here.
    pub(crate) fn at_integer(&self) -> bool {
        match self.peek_kind() {
            TokenKind::IntegerLiteral => true,
            kind if kind.is_additive() => {
                self.kind_at(1) == TokenKind::IntegerLiteral
            }
            _ => false,
        }
    }

    /// Parse `[+|-] unsigned`
    pub(crate) fn parse_integer(&mut self) -> Result<(), ParseError> {
        if self.peek_kind().is_additive() {
            self.advance("sign")?;
        }
        if !self.check(TokenKind::IntegerLiteral) {
            return Err(self.unexpected("integer literal"));
        }
        self.parse_unsigned_integer()?;

        self.emit(Production::Integer);
        Ok(())
    }

    /// Parse an unsigned literal, returning its value when it fits in a u64.
    pub(crate) fn parse_unsigned_integer(&mut self) -> Result<Option<u64>, ParseError> {
        let token = self.expect(TokenKind::IntegerLiteral, "unsigned integer")?;

        self.emit(Production::UnsignedInteger);
        Ok(token.text.parse().ok())
    }
}
