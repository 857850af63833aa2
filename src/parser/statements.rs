//! Statement parsing implementation
//!
//! Statement forms are chosen by the current token, in this order:
//!
//! | First token                  | Form                          |
//! |------------------------------|-------------------------------|
//! | `;`                          | empty statement               |
//! | `{`                          | block                         |
//! | `while`                      | while loop                    |
//! | `for`                        | restricted for loop           |
//! | `if`                         | conditional                   |
//! | identifier naming a function | call statement                |
//! | `scanf`                      | read                          |
//! | `printf`                     | write                         |
//! | `switch`                     | switch                        |
//! | `return`                     | return                        |
//! | other identifier             | assignment                    |
//!
//! Forms ending in `;` report their own production before the `;` token;
//! `<语句>` always comes last.

use crate::parser::error::ParseError;
use crate::parser::expressions::CallSite;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::trace::Production;

impl Parser<'_> {
    /// Parse statements up to (not including) the closing `}`.
    pub(crate) fn parse_statement_list(&mut self) -> Result<(), ParseError> {
        while !self.check(TokenKind::RBrace) {
            self.parse_statement()?;
        }

        self.emit(Production::StatementList);
        Ok(())
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<(), ParseError> {
        self.enter_nesting()?;
        let result = self.parse_statement_form();
        self.leave_nesting();
        result
    }

    fn parse_statement_form(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance("';'")?;
            }
            TokenKind::LBrace => {
                self.advance("'{'")?;
                self.parse_statement_list()?;
                self.expect_rbrace("after block")?;
            }
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::Identifier if self.at_function_call() => {
                self.parse_function_call(CallSite::Statement)?;
                self.expect_semicolon("after function call")?;
            }
            TokenKind::Scanf => {
                self.parse_read_statement()?;
                self.expect_semicolon("after scanf")?;
            }
            TokenKind::Printf => {
                self.parse_write_statement()?;
                self.expect_semicolon("after printf")?;
            }
            TokenKind::Switch => self.parse_switch_statement()?,
            TokenKind::Return => {
                self.parse_return_statement()?;
                self.expect_semicolon("after return")?;
            }
            TokenKind::Identifier => {
                self.parse_assignment_statement()?;
                self.expect_semicolon("after assignment")?;
            }
            _ => return Err(self.unexpected("statement")),
        }

        self.emit(Production::Statement);
        Ok(())
    }

    /// Parse `while (condition) statement`
    fn parse_while_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::While, "'while'")?;
        self.expect_lparen("after 'while'")?;
        self.parse_condition()?;
        self.expect_rparen("after while condition")?;
        self.parse_statement()?;

        self.emit(Production::LoopStatement);
        Ok(())
    }

    /// Parse the restricted for loop:
    /// `for (i = expr; condition; i = j + step) statement`
    ///
    /// The init clause is a plain assignment (no declaration) and the step
    /// clause adds or subtracts an unsigned literal.
    fn parse_for_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::For, "'for'")?;
        self.expect_lparen("after 'for'")?;

        self.expect_identifier("loop variable")?;
        self.expect(TokenKind::Assign, "'=' in for initializer")?;
        self.parse_expression()?;
        self.expect_semicolon("after for initializer")?;

        self.parse_condition()?;
        self.expect_semicolon("after for condition")?;

        self.expect_identifier("loop variable in for step")?;
        self.expect(TokenKind::Assign, "'=' in for step")?;
        self.expect_identifier("identifier in for step")?;
        self.expect_where(TokenKind::is_additive, "'+' or '-' in for step")?;
        self.parse_step()?;
        self.expect_rparen("after for clauses")?;

        self.parse_statement()?;

        self.emit(Production::LoopStatement);
        Ok(())
    }

    /// Parse the step literal of a for loop
    fn parse_step(&mut self) -> Result<(), ParseError> {
        if !self.check(TokenKind::IntegerLiteral) {
            return Err(self.unexpected("unsigned integer step"));
        }
        self.parse_unsigned_integer()?;

        self.emit(Production::Step);
        Ok(())
    }

    /// Parse `if (condition) statement [else statement]`
    fn parse_if_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::If, "'if'")?;
        self.expect_lparen("after 'if'")?;
        self.parse_condition()?;
        self.expect_rparen("after if condition")?;
        self.parse_statement()?;

        if self.check(TokenKind::Else) {
            self.advance("'else'")?;
            self.parse_statement()?;
        }

        self.emit(Production::ConditionalStatement);
        Ok(())
    }

    /// Parse `scanf(name)`
    fn parse_read_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Scanf, "'scanf'")?;
        self.expect_lparen("after 'scanf'")?;
        self.expect_identifier("variable to read into")?;
        self.expect_rparen("after scanf target")?;

        self.emit(Production::ReadStatement);
        Ok(())
    }

    /// Parse `printf("text")`, `printf("text", expr)` or `printf(expr)`
    fn parse_write_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Printf, "'printf'")?;
        self.expect_lparen("after 'printf'")?;

        if self.check(TokenKind::StringLiteral) {
            self.advance("string")?;
            self.emit(Production::StringLiteral);

            if self.check(TokenKind::Comma) {
                self.advance("','")?;
                self.parse_expression()?;
            }
        } else {
            self.parse_expression()?;
        }

        self.expect_rparen("after printf arguments")?;

        self.emit(Production::WriteStatement);
        Ok(())
    }

    /// Parse `switch (expr) { case c: stmt ... default: stmt }`
    fn parse_switch_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Switch, "'switch'")?;
        self.expect_lparen("after 'switch'")?;
        self.parse_expression()?;
        self.expect_rparen("after switch expression")?;
        self.expect_lbrace("before switch body")?;

        self.parse_case_table()?;
        self.parse_default_branch()?;

        self.expect_rbrace("after default branch")?;

        self.emit(Production::SwitchStatement);
        Ok(())
    }

    /// Parse the `case` branches of a switch
    fn parse_case_table(&mut self) -> Result<(), ParseError> {
        while self.check(TokenKind::Case) {
            self.parse_case_branch()?;
        }

        self.emit(Production::CaseTable);
        Ok(())
    }

    fn parse_case_branch(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Case, "'case'")?;
        self.parse_constant()?;
        self.expect(TokenKind::Colon, "':' after case constant")?;
        self.parse_statement()?;

        self.emit(Production::CaseBranch);
        Ok(())
    }

    /// The closing `default: statement`, required in every switch
    fn parse_default_branch(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Default, "'case' or 'default'")?;
        self.expect(TokenKind::Colon, "':' after 'default'")?;
        self.parse_statement()?;

        self.emit(Production::DefaultBranch);
        Ok(())
    }

    /// Parse `return`, `return (expr)` or `return expr`
    fn parse_return_statement(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Return, "'return'")?;

        if self.check(TokenKind::LParen) {
            self.advance("'('")?;
            self.parse_expression()?;
            self.expect_rparen("after return value")?;
        } else if !self.check(TokenKind::Semicolon) {
            // Unparenthesized form, accepted so `int f(int a){return a;}`
            // parses (see "Return" in DESIGN.md).
            self.parse_expression()?;
        }

        self.emit(Production::ReturnStatement);
        Ok(())
    }

    /// Parse `name = expr`, `name[i] = expr` or `name[i][j] = expr`
    fn parse_assignment_statement(&mut self) -> Result<(), ParseError> {
        self.expect_identifier("assignment target")?;
        self.parse_index_suffix()?;
        self.expect(TokenKind::Assign, "'=' in assignment")?;
        self.parse_expression()?;

        self.emit(Production::AssignmentStatement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::MAX_NESTING_DEPTH;
    use crate::parser::trace::{LabelStyle, TraceRecorder};

    /// Parse `body` as the body of `void main()`, returning the lines between
    /// the opening `{` and the `<statement-list>` that closes the body.
    fn body_trace(body: &str) -> Result<Vec<String>, ParseError> {
        let source = format!("void main() {{ {body} }}");
        let mut sink = TraceRecorder::new();
        Parser::new(&source, &mut sink).parse_program()?;

        let lines = sink.lines(LabelStyle::Plain);
        let end = lines.len() - 5;
        Ok(lines[5..end].to_vec())
    }

    fn body_error(body: &str) -> ParseError {
        body_trace(body).unwrap_err()
    }

    #[test]
    fn test_empty_and_block_statements() {
        let lines = body_trace("; { ; }").unwrap();
        assert_eq!(
            lines,
            [
                "SEMICN ;",
                "<statement>",
                "LBRACE {",
                "SEMICN ;",
                "<statement>",
                "<statement-list>",
                "RBRACE }",
                "<statement>",
            ]
        );
    }

    #[test]
    fn test_assignment_with_indexes() {
        let lines = body_trace("m[1][j] = 0;").unwrap();
        assert_eq!(
            lines,
            [
                "IDENFR m",
                "LBRACK [",
                "INTCON 1",
                "<unsigned-integer>",
                "<integer>",
                "<factor>",
                "<term>",
                "<expression>",
                "RBRACK ]",
                "LBRACK [",
                "IDENFR j",
                "<factor>",
                "<term>",
                "<expression>",
                "RBRACK ]",
                "ASSIGN =",
                "INTCON 0",
                "<unsigned-integer>",
                "<integer>",
                "<factor>",
                "<term>",
                "<expression>",
                "<assignment-statement>",
                "SEMICN ;",
                "<statement>",
            ]
        );
    }

    #[test]
    fn test_for_loop() {
        let lines = body_trace("for(i=0;i<10;i=i+1) x=x+1;").unwrap();
        assert_eq!(
            lines[..27],
            [
                "FORTK for",
                "LPARENT (",
                "IDENFR i",
                "ASSIGN =",
                "INTCON 0",
                "<unsigned-integer>",
                "<integer>",
                "<factor>",
                "<term>",
                "<expression>",
                "SEMICN ;",
                "IDENFR i",
                "<factor>",
                "<term>",
                "<expression>",
                "LSS <",
                "INTCON 10",
                "<unsigned-integer>",
                "<integer>",
                "<factor>",
                "<term>",
                "<expression>",
                "<condition>",
                "SEMICN ;",
                "IDENFR i",
                "ASSIGN =",
                "IDENFR i",
            ]
        );
        assert_eq!(
            lines[27..32],
            [
                "PLUS +",
                "INTCON 1",
                "<unsigned-integer>",
                "<step>",
                "RPARENT )",
            ]
        );
        assert_eq!(lines[lines.len() - 2], "<loop-statement>");
        assert_eq!(lines[lines.len() - 1], "<statement>");
    }

    #[test]
    fn test_general_for_loop_is_rejected() {
        let err = body_error("for(int i=0;i<10;i=i+1) ;");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "loop variable".to_string(),
                found: "INTTK 'int'".to_string(),
                line: 1,
            }
        );

        let err = body_error("for(i=0;i<10;i=i*2) ;");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "MULT '*'"));
    }

    #[test]
    fn test_while_and_if_else() {
        let lines = body_trace("while (a != b) if (a > b) a = a - b; else ;").unwrap();
        let productions: Vec<&str> = lines
            .iter()
            .filter(|l| l.starts_with('<'))
            .map(String::as_str)
            .collect();
        assert_eq!(
            productions,
            [
                "<factor>",
                "<term>",
                "<expression>",
                "<factor>",
                "<term>",
                "<expression>",
                "<condition>",
                "<factor>",
                "<term>",
                "<expression>",
                "<factor>",
                "<term>",
                "<expression>",
                "<condition>",
                "<factor>",
                "<term>",
                "<factor>",
                "<term>",
                "<expression>",
                "<assignment-statement>",
                "<statement>",
                "<statement>",
                "<conditional-statement>",
                "<statement>",
                "<loop-statement>",
                "<statement>",
            ]
        );
    }

    #[test]
    fn test_read_and_write() {
        let lines = body_trace("scanf(n); printf(\"n=\", n); printf(n);").unwrap();
        assert_eq!(
            lines,
            [
                "SCANFTK scanf",
                "LPARENT (",
                "IDENFR n",
                "RPARENT )",
                "<read-statement>",
                "SEMICN ;",
                "<statement>",
                "PRINTFTK printf",
                "LPARENT (",
                "STRCON n=",
                "<string>",
                "COMMA ,",
                "IDENFR n",
                "<factor>",
                "<term>",
                "<expression>",
                "RPARENT )",
                "<write-statement>",
                "SEMICN ;",
                "<statement>",
                "PRINTFTK printf",
                "LPARENT (",
                "IDENFR n",
                "<factor>",
                "<term>",
                "<expression>",
                "RPARENT )",
                "<write-statement>",
                "SEMICN ;",
                "<statement>",
            ]
        );
    }

    #[test]
    fn test_switch() {
        let lines =
            body_trace("switch (c) { case 'a': ; case -1: ; default: ; }").unwrap();
        let productions: Vec<&str> = lines
            .iter()
            .filter(|l| l.starts_with('<'))
            .map(String::as_str)
            .collect();
        assert_eq!(
            productions,
            [
                "<factor>",
                "<term>",
                "<expression>",
                "<constant>",
                "<statement>",
                "<case-branch>",
                "<unsigned-integer>",
                "<integer>",
                "<constant>",
                "<statement>",
                "<case-branch>",
                "<case-table>",
                "<statement>",
                "<default-branch>",
                "<switch-statement>",
                "<statement>",
            ]
        );
    }

    #[test]
    fn test_switch_without_cases_still_needs_default() {
        body_trace("switch (c) { default: ; }").unwrap();

        let err = body_error("switch (c) { }");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, ref found, .. }
                if expected == "'case' or 'default'" && found == "RBRACE '}'"
        ));

        let mut sink = TraceRecorder::new();
        let err = Parser::new("void main() { switch (c) {", &mut sink)
            .parse_program()
            .unwrap_err();
        assert!(matches!(err, ParseError::PrematureEndOfInput { .. }));
    }

    #[test]
    fn test_return_forms() {
        let lines = body_trace("return; return (1); return x;").unwrap();
        assert_eq!(
            lines[..3],
            ["RETURNTK return", "<return-statement>", "SEMICN ;"]
        );
        assert_eq!(lines[4..7], ["RETURNTK return", "LPARENT (", "INTCON 1"]);
        assert_eq!(lines[12], "RPARENT )");
        assert_eq!(lines[13], "<return-statement>");
        assert_eq!(lines[16..18], ["RETURNTK return", "IDENFR x"]);
    }

    #[test]
    fn test_statement_errors() {
        assert!(matches!(
            body_error("else ;"),
            ParseError::UnexpectedToken { ref expected, .. } if expected == "statement"
        ));
        assert!(matches!(
            body_error("x + 1;"),
            ParseError::UnexpectedToken { ref expected, .. } if expected == "'=' in assignment"
        ));
        assert!(matches!(
            body_error("a[1][2][3] = 0;"),
            ParseError::UnexpectedToken { ref found, .. } if found == "LBRACK '['"
        ));

        let mut sink = TraceRecorder::new();
        let err = Parser::new("void main() { x = 1;", &mut sink)
            .parse_program()
            .unwrap_err();
        assert!(matches!(err, ParseError::PrematureEndOfInput { .. }));
    }

    #[test]
    fn test_deep_statement_nesting_fails_with_error() {
        let too_deep = ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
            line: 1,
        };

        let blocks = format!("{}{}", "{".repeat(200_000), "}".repeat(200_000));
        assert_eq!(body_error(&blocks), too_deep);

        let loops = format!("{};", "while (a < b) ".repeat(10_000));
        assert_eq!(body_error(&loops), too_deep);
    }

    #[test]
    fn test_nesting_depth_is_released_after_each_statement() {
        // Each group alone is within the limit; together they would not be.
        let group = format!("{}{}", "{".repeat(200), "}".repeat(200));
        let lines = body_trace(&format!("{group} {group}")).unwrap();
        assert_eq!(lines.iter().filter(|l| *l == "LBRACE {").count(), 400);
    }
}
