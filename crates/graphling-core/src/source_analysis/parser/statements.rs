// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for Graphling.
//!
//! The statement loop is the parser's unique recovery frame: a fatal error
//! anywhere below it unwinds here, the token stream is resynchronized at the
//! next separator, and parsing resumes. This is what makes one broken
//! statement cost exactly one statement.

use crate::ast::{
    BinaryOp, ExprStatement, Expression, RegressionEntry, RegressionParameters, Statement,
    StyleMapping,
};
use crate::source_analysis::{Punct, Span, TokenKind};

use super::{Node, ParseAbort, ParseResult, Parser, bp};

impl Parser<'_> {
    // ========================================================================
    // The statement loop
    // ========================================================================

    /// Parses statements until `}` (when nested) or end of input.
    ///
    /// At the top level a stray `}` is diagnosed and skipped; nested calls
    /// (folder and table bodies) leave it for their caller to consume.
    pub(super) fn parse_statements(&mut self, is_top: bool) -> Vec<Statement> {
        let mut statements = Vec::new();

        loop {
            while matches!(self.peek_kind(), TokenKind::Semi) {
                self.advance();
            }

            match self.peek_kind() {
                TokenKind::Punct(Punct::RightBrace) => {
                    if is_top {
                        let token = self.advance();
                        self.error("Unexpected '}'", Some(token.span()));
                        continue;
                    }
                    return statements;
                }
                TokenKind::Eof => return statements,
                _ => {}
            }

            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    if self.expect_statement_end().is_err() {
                        self.scan_to_next_statement();
                    }
                }
                Err(ParseAbort) => self.scan_to_next_statement(),
            }
        }
    }

    /// Parses one statement: an expression at top power, finalized.
    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let node = self.parse_main(bp::TOP, true)?;
        self.finalize_statement(node)
    }

    /// Requires a statement terminator: a separator (consumed), or a `}` or
    /// end of input (left in place).
    fn expect_statement_end(&mut self) -> ParseResult<()> {
        match self.peek_kind() {
            TokenKind::Punct(Punct::RightBrace) | TokenKind::Eof => Ok(()),
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            _ => self.expect_semi().map(|_| ()),
        }
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    /// Turns a parsed node into a statement.
    ///
    /// Statements pass through. A bare string becomes a text note. An
    /// equation whose right side is a regression, `e1 = a ~ b`, becomes the
    /// regression statement itself with `e1` recorded as the residual
    /// variable. Anything else wraps as a plain expression statement.
    pub(super) fn finalize_statement(&mut self, node: Node) -> ParseResult<Statement> {
        let expr = match node {
            Node::Stmt(statement) => return Ok(statement),
            Node::Expr(expr) => expr,
        };

        match expr {
            Expression::String { value, span } => Ok(Statement::Text {
                text: value,
                style: None,
                span,
            }),

            Expression::StyleMapping(mapping) => Err(self.fatal(
                "A style mapping cannot stand alone as a statement",
                mapping.span,
            )),

            Expression::Binary {
                op: BinaryOp::Eq,
                left,
                right,
                span,
            } if matches!(*left, Expression::Identifier(_))
                && matches!(
                    *right,
                    Expression::Binary {
                        op: BinaryOp::Sim,
                        ..
                    }
                ) =>
            {
                let Expression::Identifier(residual) = *left else {
                    unreachable!()
                };
                Ok(Statement::Expr(ExprStatement {
                    expr: *right,
                    style: None,
                    parameters: None,
                    residual_variable: Some(residual),
                    span,
                }))
            }

            other => Ok(Statement::Expr(ExprStatement::bare(other))),
        }
    }

    // ========================================================================
    // Keyword statements
    // ========================================================================

    /// Parses `table { ... }`. Columns must be expression statements;
    /// anything else is diagnosed and dropped.
    pub(super) fn parse_table(&mut self, keyword: Span) -> ParseResult<Statement> {
        self.expect_punct(Punct::LeftBrace)?;
        let body = self.parse_statements(false);
        let close = self.expect_punct(Punct::RightBrace)?;

        let mut columns = Vec::with_capacity(body.len());
        for statement in body {
            match statement {
                Statement::Expr(column) => columns.push(column),
                other => {
                    self.error("Tables may only contain expressions", other.span());
                }
            }
        }

        Ok(Statement::Table {
            columns,
            style: None,
            span: Some(keyword.merge(close.span())),
        })
    }

    /// Parses `folder "title" { ... }`.
    pub(super) fn parse_folder(&mut self, keyword: Span) -> ParseResult<Statement> {
        let title_token = self.expect_string()?;
        let title = self.decode_string_token(&title_token);
        self.expect_punct(Punct::LeftBrace)?;
        let children = self.parse_statements(false);
        let close = self.expect_punct(Punct::RightBrace)?;
        Ok(Statement::Folder {
            title,
            children,
            style: None,
            span: Some(keyword.merge(close.span())),
        })
    }

    /// Parses `image "name"`.
    pub(super) fn parse_image(&mut self, keyword: Span) -> ParseResult<Statement> {
        let name_token = self.expect_string()?;
        let name = self.decode_string_token(&name_token);
        Ok(Statement::Image {
            name,
            style: None,
            span: Some(keyword.merge(name_token.span())),
        })
    }

    /// Parses `settings` (the style arrives separately via `@{`).
    pub(super) fn parse_settings(&mut self, keyword: Span) -> Statement {
        Statement::Settings {
            style: None,
            span: Some(keyword),
        }
    }

    /// Parses `ticker handler`; the handler binds just above style
    /// attachment so `ticker a -> a+1 @{ minStep: 100 }` styles the ticker.
    pub(super) fn parse_ticker(&mut self, keyword: Span) -> ParseResult<Statement> {
        let handler = self.parse_expr(bp::META)?;
        let span = Span::merge_opt(Some(keyword), handler.span());
        Ok(Statement::Ticker {
            handler,
            style: None,
            span,
        })
    }

    fn decode_string_token(&mut self, token: &crate::source_analysis::Token) -> ecow::EcoString {
        let TokenKind::String(lexeme) = token.kind() else {
            unreachable!()
        };
        let lexeme = lexeme.clone();
        self.decode_string(&lexeme, token.span())
    }

    // ========================================================================
    // Meta consequents: `@{` and `#{`
    // ========================================================================

    /// Parses the `@{ ... }` style attachment: finalizes the left operand
    /// into a statement and attaches the mapping to it.
    pub(super) fn parse_style_consequent(&mut self, left: Node, open: Span) -> ParseResult<Node> {
        let mut statement = self.finalize_statement(left)?;
        let mapping = self.parse_style_mapping(open)?;
        statement.set_style(mapping);
        Ok(Node::Stmt(statement))
    }

    /// Parses a style mapping after a consumed `@{`.
    ///
    /// Entries are `key: value` pairs separated by commas, with a trailing
    /// comma permitted. Keys are raw identifiers (never subscripted); values
    /// may be nested mappings.
    pub(super) fn parse_style_mapping(&mut self, open: Span) -> ParseResult<StyleMapping> {
        let mut entries = Vec::new();
        let close;

        loop {
            if self.peek_kind().is_punct(Punct::RightBrace) {
                close = self.advance().span();
                break;
            }

            let key_token = self.expect_identifier()?;
            let TokenKind::Identifier(property) = key_token.kind().clone() else {
                unreachable!()
            };
            self.expect_punct(Punct::Colon)?;
            let value = self.parse_expr(bp::SEQ)?;
            let span = Span::merge_opt(Some(key_token.span()), value.span());
            entries.push(crate::ast::MappingEntry {
                property,
                expr: value,
                span,
            });

            if self.peek_kind().is_punct(Punct::Comma) {
                self.advance();
            } else {
                close = self.expect_punct(Punct::RightBrace)?.span();
                break;
            }
        }

        Ok(StyleMapping {
            entries,
            span: Some(open.merge(close)),
        })
    }

    /// Parses the `#{ ... }` regression-parameter attachment.
    ///
    /// The left operand must finalize to a regression statement (its
    /// expression a `~` comparison); the entries must be `name=value`
    /// bindings.
    pub(super) fn parse_regression_consequent(
        &mut self,
        left: Node,
        open: Span,
    ) -> ParseResult<Node> {
        let statement = self.finalize_statement(left)?;
        let statement_span = statement.span();
        let Statement::Expr(mut stmt) = statement else {
            return Err(self.fatal(
                "Parameters require a regression of the form 'a ~ b' before '#{'",
                statement_span,
            ));
        };
        if !matches!(
            stmt.expr,
            Expression::Binary {
                op: BinaryOp::Sim,
                ..
            }
        ) {
            return Err(self.fatal(
                "Parameters require a regression of the form 'a ~ b' before '#{'",
                stmt.span,
            ));
        }

        let items = self.parse_bare_seq()?;
        let close = self.expect_punct(Punct::RightBrace)?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let binding = self.into_assignment(
                item,
                "Expected regression parameters to be assignments like 'm=1'",
            )?;
            entries.push(RegressionEntry {
                variable: binding.variable,
                value: binding.expr,
                span: binding.span,
            });
        }

        let parameters_span = Some(open.merge(close.span()));
        stmt.parameters = Some(RegressionParameters {
            entries,
            span: parameters_span,
        });
        stmt.span = Span::merge_opt(stmt.span, parameters_span);
        Ok(Node::Stmt(Statement::Expr(stmt)))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expression, Statement};
    use crate::source_analysis::{NameTable, Severity, parse};

    fn parse_ok(source: &str) -> Vec<Statement> {
        let (program, diagnostics) = parse(source, &NameTable::default());
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics for {source:?}: {diagnostics:?}"
        );
        program.children
    }

    // ========================================================================
    // Plain expression statements
    // ========================================================================

    #[test]
    fn simple_equation() {
        let statements = parse_ok("y=x");
        assert_eq!(statements.len(), 1);
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Binary {
            op: BinaryOp::Eq,
            left,
            right,
            ..
        } = &stmt.expr
        else {
            panic!("expected an equation");
        };
        assert!(matches!(**left, Expression::Identifier(ref id) if id.name == "y"));
        assert!(matches!(**right, Expression::Identifier(ref id) if id.name == "x"));
        assert!(stmt.style.is_none());
        assert!(stmt.parameters.is_none());
        assert!(stmt.residual_variable.is_none());
    }

    #[test]
    fn function_definition() {
        let statements = parse_ok("f(x)=x^2+1");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Binary {
            op: BinaryOp::Eq,
            left,
            right,
            ..
        } = &stmt.expr
        else {
            panic!("expected an equation");
        };
        let Expression::Call { callee, arguments, .. } = &**left else {
            panic!("expected a call on the left");
        };
        assert!(matches!(**callee, Expression::Identifier(ref id) if id.name == "f"));
        assert_eq!(arguments.len(), 1);
        let Expression::Binary {
            op: BinaryOp::Add,
            left: power,
            ..
        } = &**right
        else {
            panic!("expected a sum on the right");
        };
        assert!(matches!(
            **power,
            Expression::Binary {
                op: BinaryOp::Pow,
                ..
            }
        ));
    }

    #[test]
    fn extra_separators_are_absorbed() {
        let statements = parse_ok("foo; ;; bar=1");
        assert_eq!(statements.len(), 2);
        let Statement::Expr(first) = &statements[0] else {
            panic!("expected an expression statement");
        };
        // Multi-letter names pick up an implicit subscript.
        assert!(matches!(&first.expr, Expression::Identifier(id) if id.name == "f_oo"));
    }

    #[test]
    fn blank_lines_separate_statements() {
        let statements = parse_ok("y=x\n\nr=2");
        assert_eq!(statements.len(), 2);
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    #[test]
    fn bare_string_becomes_text() {
        let statements = parse_ok("\"a note\"");
        let Statement::Text { text, .. } = &statements[0] else {
            panic!("expected a text statement");
        };
        assert_eq!(text, "a note");
    }

    #[test]
    fn string_escapes_decode() {
        let statements = parse_ok(r#""line\none\ttwo \"quoted\" A""#);
        let Statement::Text { text, .. } = &statements[0] else {
            panic!("expected a text statement");
        };
        assert_eq!(text, "line\none\ttwo \"quoted\" A");
    }

    #[test]
    fn named_regression_records_the_residual_variable() {
        let statements = parse_ok("e1 = a ~ b");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        assert!(matches!(
            stmt.expr,
            Expression::Binary {
                op: BinaryOp::Sim,
                ..
            }
        ));
        let residual = stmt.residual_variable.as_ref().expect("residual variable");
        assert_eq!(residual.name, "e_1");
    }

    #[test]
    fn bare_regression_has_no_residual_variable() {
        let statements = parse_ok("a ~ b");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        assert!(matches!(
            stmt.expr,
            Expression::Binary {
                op: BinaryOp::Sim,
                ..
            }
        ));
        assert!(stmt.residual_variable.is_none());
    }

    // ========================================================================
    // Keyword statements
    // ========================================================================

    #[test]
    fn table_collects_columns() {
        let statements = parse_ok("table { x1=[1,2]; y1=[3,4] }");
        let Statement::Table { columns, .. } = &statements[0] else {
            panic!("expected a table");
        };
        assert_eq!(columns.len(), 2);
        assert!(matches!(
            columns[0].expr,
            Expression::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn table_rejects_non_expression_columns() {
        let (program, diagnostics) =
            parse("table { \"note\"; x1=[1,2] }", &NameTable::default());
        let Statement::Table { columns, .. } = &program.children[0] else {
            panic!("expected a table");
        };
        assert_eq!(columns.len(), 1);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("Tables may only contain expressions"))
        );
    }

    #[test]
    fn folder_nests_statements() {
        let statements = parse_ok("folder \"stuff\" { y=x; r=2 }");
        let Statement::Folder {
            title, children, ..
        } = &statements[0]
        else {
            panic!("expected a folder");
        };
        assert_eq!(title, "stuff");
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn image_statement() {
        let statements = parse_ok("image \"logo\"");
        let Statement::Image { name, .. } = &statements[0] else {
            panic!("expected an image");
        };
        assert_eq!(name, "logo");
    }

    #[test]
    fn settings_take_a_style() {
        let statements = parse_ok("settings @{ randomSeed: 5 }");
        let Statement::Settings { style, .. } = &statements[0] else {
            panic!("expected settings");
        };
        let style = style.as_ref().expect("style mapping");
        assert_eq!(style.entries.len(), 1);
        assert_eq!(style.entries[0].property, "randomSeed");
    }

    #[test]
    fn ticker_handler_and_style() {
        let statements = parse_ok("ticker a -> a+1 @{ minStep: 100 }");
        let Statement::Ticker { handler, style, .. } = &statements[0] else {
            panic!("expected a ticker");
        };
        assert!(matches!(handler, Expression::UpdateRule { .. }));
        assert!(style.is_some());
    }

    // ========================================================================
    // Style and regression attachments
    // ========================================================================

    #[test]
    fn style_attaches_to_the_finalized_statement() {
        let statements = parse_ok("y=x @{ hidden: true }");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        let style = stmt.style.as_ref().expect("style mapping");
        assert_eq!(style.entries.len(), 1);
        assert_eq!(style.entries[0].property, "hidden");
        assert!(
            matches!(&style.entries[0].expr, Expression::Identifier(id) if id.name == "true")
        );
    }

    #[test]
    fn style_values_may_be_nested_mappings() {
        let statements = parse_ok("settings @{ viewport: @{ xmin: -10, xmax: 10 } }");
        let Statement::Settings { style, .. } = &statements[0] else {
            panic!("expected settings");
        };
        let style = style.as_ref().expect("style mapping");
        let Expression::StyleMapping(nested) = &style.entries[0].expr else {
            panic!("expected a nested mapping");
        };
        assert_eq!(nested.entries.len(), 2);
    }

    #[test]
    fn style_allows_a_trailing_comma() {
        let statements = parse_ok("y=x @{ hidden: true, }");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        assert_eq!(stmt.style.as_ref().expect("style").entries.len(), 1);
    }

    #[test]
    fn regression_parameters_attach() {
        let statements = parse_ok("y1 ~ m*x1+b #{ m=1.5, b=2.3 }");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        assert!(matches!(
            stmt.expr,
            Expression::Binary {
                op: BinaryOp::Sim,
                ..
            }
        ));
        let parameters = stmt.parameters.as_ref().expect("parameters");
        assert_eq!(parameters.entries.len(), 2);
        assert_eq!(parameters.entries[0].variable.name, "m");
        assert!(
            matches!(parameters.entries[0].value, Expression::Number { value, .. } if value == 1.5)
        );
        assert_eq!(parameters.entries[1].variable.name, "b");
    }

    #[test]
    fn regression_parameters_require_a_regression() {
        let (program, diagnostics) = parse("y=x #{ m=1 }", &NameTable::default());
        assert!(program.children.is_empty());
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("regression"))
        );
    }

    #[test]
    fn named_regression_keeps_residual_and_parameters() {
        let statements = parse_ok("e1 = y1 ~ m*x1 #{ m=2 }");
        let Statement::Expr(stmt) = &statements[0] else {
            panic!("expected an expression statement");
        };
        assert_eq!(
            stmt.residual_variable.as_ref().expect("residual").name,
            "e_1"
        );
        assert_eq!(stmt.parameters.as_ref().expect("parameters").entries.len(), 1);
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    #[test]
    fn a_broken_statement_does_not_take_its_neighbours() {
        let (program, diagnostics) = parse("1 < x > y; y=x", &NameTable::default());
        assert_eq!(program.children.len(), 1);
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn stray_closing_brace_is_skipped_at_top_level() {
        let (program, diagnostics) = parse("} y=x", &NameTable::default());
        assert_eq!(program.children.len(), 1);
        assert!(diagnostics.iter().any(|d| d.message == "Unexpected '}'"));
    }

    #[test]
    fn missing_separator_is_diagnosed_and_skipped() {
        let (_, diagnostics) = parse("y=x r=2", &NameTable::default());
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.starts_with("Expected ';' but got"))
        );
    }

    #[test]
    fn every_diagnostic_is_an_error_except_the_empty_warning() {
        let (_, diagnostics) = parse("1 < x > y", &NameTable::default());
        assert!(
            diagnostics
                .iter()
                .all(|d| d.severity == Severity::Error)
        );
    }
}
