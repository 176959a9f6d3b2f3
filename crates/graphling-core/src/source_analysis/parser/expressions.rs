// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Graphling.
//!
//! This module contains the Pratt dispatcher and every expression parselet:
//!
//! - Literals (numbers, strings) and identifiers
//! - Prefix negation and postfix factorial
//! - Binary operators, comparisons, and double inequalities
//! - Lists, ranges, and list comprehensions (`[...]`)
//! - Piecewise expressions (`{...}`)
//! - Function calls, prime notation (`f''(x)`), and Leibniz derivatives
//! - Big operators (`sum`, `product`, `integral`)
//! - Update rules (`->`) and substitutions (`with`)
//! - Style mapping literals (`@{...}`)
//!
//! Statement-producing parselets (`table`, `folder`, the `@{`/`#{`
//! consequents) live in the sibling `statements` module.

use ecow::eco_format;

use crate::ast::{Assignment, BinaryOp, Expression, Identifier, PiecewiseBranch, RepeatedOp};
use crate::source_analysis::names::{Normalization, normalize_identifier};
use crate::source_analysis::{Keyword, Punct, Span, Token, TokenKind};

use super::{Node, ParseResult, Parser, bp, consequent_binding_power};

/// The synthesized `1` consequent of a bare piecewise condition.
fn implicit_one() -> Expression {
    Expression::Number {
        value: 1.0,
        span: None,
    }
}

/// The synthesized `else` condition of a trailing piecewise default.
fn implicit_else() -> Expression {
    Expression::Identifier(Identifier::new("else", None))
}

/// Builds a binary expression spanning both operands.
fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let span = Span::merge_opt(left.span(), right.span());
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

/// Maps a comparison punct to its operator.
const fn comparison_op(punct: Punct) -> Option<BinaryOp> {
    match punct {
        Punct::Lt => Some(BinaryOp::Lt),
        Punct::Le => Some(BinaryOp::Le),
        Punct::Eq => Some(BinaryOp::Eq),
        Punct::Ge => Some(BinaryOp::Ge),
        Punct::Gt => Some(BinaryOp::Gt),
        _ => None,
    }
}

impl Parser<'_> {
    // ========================================================================
    // The Pratt loop
    // ========================================================================

    /// Parses one expression (or styled statement) at the given threshold.
    ///
    /// Consumes an initial token, then keeps consuming consequent tokens
    /// while their binding power exceeds `last_bp`. `is_statement_top` is
    /// true only for the outermost call of a statement; it changes how `=`
    /// binds its right operand so that action sequences parse as
    /// `A = (a -> a+1, b -> b+1)`.
    pub(super) fn parse_main(&mut self, last_bp: u8, is_statement_top: bool) -> ParseResult<Node> {
        let at = self.peek().span();
        self.enter_nesting(at)?;
        let result = self.parse_main_inner(last_bp, is_statement_top);
        self.leave_nesting();
        result
    }

    fn parse_main_inner(&mut self, last_bp: u8, is_statement_top: bool) -> ParseResult<Node> {
        let token = self.advance();
        let mut left = self.parse_initial(token)?;

        loop {
            let Some(power) = consequent_binding_power(self.peek().kind()) else {
                break;
            };
            if power <= last_bp {
                break;
            }
            let token = self.advance();
            left = self.parse_consequent(left, &token, is_statement_top)?;
        }

        Ok(left)
    }

    /// Parses a sub-expression, rejecting the statement-producing parselets.
    pub(super) fn parse_expr(&mut self, last_bp: u8) -> ParseResult<Expression> {
        let node = self.parse_main(last_bp, false)?;
        self.expr_node(node)
    }

    /// Unwraps a node known to be an expression; a statement here is fatal.
    pub(super) fn expr_node(&mut self, node: Node) -> ParseResult<Expression> {
        match node {
            Node::Expr(expr) => Ok(expr),
            Node::Stmt(stmt) => Err(self.fatal(
                "A styled statement cannot be part of an expression",
                stmt.span(),
            )),
        }
    }

    // ========================================================================
    // Initial parselets
    // ========================================================================

    /// Dispatches a token that must begin an expression.
    fn parse_initial(&mut self, token: Token) -> ParseResult<Node> {
        let span = token.span();
        match token.into_kind() {
            TokenKind::Number(lexeme) => {
                let Ok(value) = lexeme.parse::<f64>() else {
                    return Err(
                        self.fatal(eco_format!("Invalid number literal: {lexeme}"), Some(span))
                    );
                };
                Ok(Node::Expr(Expression::Number {
                    value,
                    span: Some(span),
                }))
            }

            TokenKind::String(lexeme) => {
                let value = self.decode_string(&lexeme, span);
                Ok(Node::Expr(Expression::String {
                    value,
                    span: Some(span),
                }))
            }

            TokenKind::Identifier(lexeme) => {
                let id = self.normalize(&lexeme, span)?;
                Ok(Node::Expr(Expression::Identifier(id)))
            }

            TokenKind::Punct(Punct::LeftParen) => self.parse_paren(span).map(Node::Expr),

            TokenKind::Punct(Punct::Minus) => {
                let operand = self.parse_expr(bp::PREFIX)?;
                let span = Span::merge_opt(Some(span), operand.span());
                Ok(Node::Expr(Expression::Negate {
                    expr: Box::new(operand),
                    span,
                }))
            }

            TokenKind::Punct(Punct::LeftBracket) => self.parse_list_body(span).map(Node::Expr),

            TokenKind::Punct(Punct::LeftBrace) => self.parse_piecewise(span).map(Node::Expr),

            TokenKind::Punct(Punct::StyleOpen) => {
                let mapping = self.parse_style_mapping(span)?;
                Ok(Node::Expr(Expression::StyleMapping(mapping)))
            }

            TokenKind::Keyword(Keyword::Sum) => {
                self.parse_repeated(RepeatedOp::Sum, span).map(Node::Expr)
            }
            TokenKind::Keyword(Keyword::Product) => self
                .parse_repeated(RepeatedOp::Product, span)
                .map(Node::Expr),
            TokenKind::Keyword(Keyword::Integral) => self
                .parse_repeated(RepeatedOp::Integral, span)
                .map(Node::Expr),

            TokenKind::Keyword(Keyword::Table) => self.parse_table(span).map(Node::Stmt),
            TokenKind::Keyword(Keyword::Folder) => self.parse_folder(span).map(Node::Stmt),
            TokenKind::Keyword(Keyword::Image) => self.parse_image(span).map(Node::Stmt),
            TokenKind::Keyword(Keyword::Settings) => Ok(Node::Stmt(self.parse_settings(span))),
            TokenKind::Keyword(Keyword::Ticker) => self.parse_ticker(span).map(Node::Stmt),

            TokenKind::Eof => Err(self.fatal("Unexpected end of input", Some(span))),

            other => Err(self.fatal(eco_format!("Unexpected text: '{other}'."), Some(span))),
        }
    }

    /// Parses `( ... )`: either a Leibniz derivative head or a grouped
    /// expression. A grouped comma pair becomes a paren-wrapped sequence (a
    /// point literal); any other grouped node just widens its span over the
    /// parentheses.
    fn parse_paren(&mut self, open: Span) -> ParseResult<Expression> {
        if self.peek_kind().is_punct(Punct::DDeriv) {
            self.advance();
            let variable_token = self.expect_identifier()?;
            let variable = self.identifier_from(&variable_token)?;
            self.expect_punct(Punct::RightParen)?;
            let operand = self.parse_expr(bp::DERIVATIVE)?;
            let span = Span::merge_opt(Some(open), operand.span());
            return Ok(Expression::Derivative {
                expr: Box::new(operand),
                variable,
                span,
            });
        }

        let inner = self.parse_expr(bp::TOP)?;
        let close = self.expect_punct(Punct::RightParen)?;
        let span = Some(open.merge(close.span()));
        match inner {
            Expression::Sequence { left, right, .. } => Ok(Expression::Sequence {
                left,
                right,
                paren_wrapped: true,
                span,
            }),
            other => Ok(other.with_span(span)),
        }
    }

    /// Parses a big operator: `sum i=(1...10) i^2`.
    ///
    /// The bounds are grouped in parentheses around `...`; the term binds at
    /// additive power, so `sum i=(1...5) i^2 + 3` adds 3 outside the sum.
    fn parse_repeated(&mut self, op: RepeatedOp, keyword: Span) -> ParseResult<Expression> {
        let index_token = self.expect_identifier()?;
        let index = self.identifier_from(&index_token)?;
        self.expect_punct(Punct::Eq)?;
        self.expect_punct(Punct::LeftParen)?;
        let start = self.parse_expr(bp::TOP)?;
        self.expect_punct(Punct::Ellipsis)?;
        let end = self.parse_expr(bp::TOP)?;
        self.expect_punct(Punct::RightParen)?;
        let term = self.parse_expr(bp::ADD)?;
        let span = Span::merge_opt(Some(keyword), term.span());
        Ok(Expression::Repeated {
            op,
            index,
            start: Box::new(start),
            end: Box::new(end),
            expr: Box::new(term),
            span,
        })
    }

    /// Parses the body of `[ ... ]`: a list, a range, or a comprehension.
    ///
    /// Also used by the access parselet, so `L[1...5]` and `L[i for ...]`
    /// index with the same grammar.
    pub(super) fn parse_list_body(&mut self, open: Span) -> ParseResult<Expression> {
        let start_values = self.parse_bare_seq()?;

        match self.peek_kind() {
            TokenKind::Punct(Punct::Ellipsis) => {
                self.advance();
                if self.peek_kind().is_punct(Punct::Comma) {
                    self.advance();
                }
                let end_values = self.parse_bare_seq()?;
                let close = self.expect_punct(Punct::RightBracket)?;
                Ok(Expression::Range {
                    start_values,
                    end_values,
                    span: Some(open.merge(close.span())),
                })
            }

            TokenKind::Punct(Punct::RightBracket) => {
                let close = self.advance();
                Ok(Expression::List {
                    values: start_values,
                    span: Some(open.merge(close.span())),
                })
            }

            TokenKind::Keyword(Keyword::For) => {
                self.advance();
                let mut start_values = start_values;
                let Some(element) = start_values.pop() else {
                    return Err(
                        self.fatal("Expected exactly one expression before 'for'", Some(open))
                    );
                };
                if !start_values.is_empty() {
                    return Err(self
                        .fatal("Expected exactly one expression before 'for'", element.span()));
                }

                let items = self.parse_bare_seq()?;
                let mut assignments = Vec::with_capacity(items.len());
                for item in items {
                    assignments.push(
                        self.into_assignment(item, "Expected 'for' to be followed by a list of assignments like 'i=[1...10]'")?,
                    );
                }
                if assignments.is_empty() {
                    let at = self.peek().span();
                    return Err(self.fatal(
                        "Expected 'for' to be followed by a list of assignments like 'i=[1...10]'",
                        Some(at),
                    ));
                }
                let close = self.expect_punct(Punct::RightBracket)?;
                Ok(Expression::ListComprehension {
                    expr: Box::new(element),
                    assignments,
                    span: Some(open.merge(close.span())),
                })
            }

            other => {
                let at = self.peek().span();
                Err(self.fatal(
                    eco_format!("Expected ']' but got '{other}'"),
                    Some(at),
                ))
            }
        }
    }

    /// Parses a comma-separated run of expressions without wrapping them in
    /// sequence nodes. Stops before `]` or `...`, or after any item not
    /// followed by a comma.
    pub(super) fn parse_bare_seq(&mut self) -> ParseResult<Vec<Expression>> {
        let mut items = Vec::new();
        loop {
            if matches!(
                self.peek_kind(),
                TokenKind::Punct(Punct::RightBracket | Punct::Ellipsis)
            ) {
                break;
            }
            items.push(self.parse_expr(bp::SEQ)?);
            if self.peek_kind().is_punct(Punct::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(items)
    }

    /// Parses `{ ... }` piecewise branches.
    ///
    /// Each branch is `condition: consequent`. A bare condition gets the
    /// implicit consequent `1`. A final non-comparison after at least one
    /// branch is the default: it becomes an `else` branch whose consequent
    /// is that expression. The first branch must be a real comparison.
    fn parse_piecewise(&mut self, open: Span) -> ParseResult<Expression> {
        let mut branches = Vec::new();
        let close;

        loop {
            let condition = self.parse_expr(bp::SEQ)?;
            let separator = self.advance();
            match separator.kind() {
                TokenKind::Punct(Punct::RightBrace) => {
                    if branches.is_empty() || condition.is_comparison() {
                        self.require_comparison(&condition)?;
                        branches.push(branch(condition, implicit_one()));
                    } else {
                        branches.push(branch(implicit_else(), condition));
                    }
                    close = separator.span();
                    break;
                }

                TokenKind::Punct(Punct::Colon) => {
                    let consequent = self.parse_expr(bp::SEQ)?;
                    self.require_comparison(&condition)?;
                    branches.push(branch(condition, consequent));
                    let after = self.advance();
                    match after.kind() {
                        TokenKind::Punct(Punct::Comma) => {}
                        TokenKind::Punct(Punct::RightBrace) => {
                            close = after.span();
                            break;
                        }
                        _ => {
                            return Err(self
                                .fatal("Unexpected character in Piecewise", Some(after.span())));
                        }
                    }
                }

                TokenKind::Punct(Punct::Comma) => {
                    self.require_comparison(&condition)?;
                    branches.push(branch(condition, implicit_one()));
                }

                _ => {
                    return Err(
                        self.fatal("Unexpected character in Piecewise", Some(separator.span()))
                    );
                }
            }
        }

        Ok(Expression::Piecewise {
            branches,
            span: Some(open.merge(close)),
        })
    }

    /// Fatal unless the expression can stand as a piecewise condition.
    fn require_comparison(&mut self, condition: &Expression) -> ParseResult<()> {
        if condition.is_comparison() {
            Ok(())
        } else {
            Err(self.fatal(
                "Piecewise condition must be a comparison",
                condition.span(),
            ))
        }
    }

    // ========================================================================
    // Consequent parselets
    // ========================================================================

    /// Dispatches a token that extends an already-parsed left operand.
    fn parse_consequent(
        &mut self,
        left: Node,
        token: &Token,
        is_statement_top: bool,
    ) -> ParseResult<Node> {
        // The style and regression parselets finalize their left operand
        // into a statement; everything else requires an expression.
        match token.kind() {
            TokenKind::Punct(Punct::StyleOpen) => {
                return self.parse_style_consequent(left, token.span());
            }
            TokenKind::Punct(Punct::RegressionOpen) => {
                return self.parse_regression_consequent(left, token.span());
            }
            _ => {}
        }

        let left = self.expr_node(left)?;
        let expr = match token.kind() {
            TokenKind::Punct(punct) => match punct {
                Punct::Plus => binary(BinaryOp::Add, left, self.parse_expr(bp::ADD)?),
                Punct::Minus => binary(BinaryOp::Sub, left, self.parse_expr(bp::ADD)?),
                Punct::Star => binary(BinaryOp::Mul, left, self.parse_expr(bp::MUL)?),
                Punct::Slash => binary(BinaryOp::Div, left, self.parse_expr(bp::MUL)?),
                // Right-associative: recurse below our own power.
                Punct::Caret => binary(BinaryOp::Pow, left, self.parse_expr(bp::POW - 1)?),
                Punct::Sim => binary(BinaryOp::Sim, left, self.parse_expr(bp::SIM)?),

                Punct::Lt | Punct::Le | Punct::Eq | Punct::Ge | Punct::Gt => {
                    let Some(op) = comparison_op(*punct) else {
                        unreachable!()
                    };
                    self.parse_comparison(left, op, is_statement_top)?
                }

                Punct::Arrow => self.parse_update_rule(left)?,
                Punct::Comma => {
                    // A comma directly before `...` belongs to range syntax;
                    // the sequence ends and the left operand stands alone.
                    if self.peek_kind().is_punct(Punct::Ellipsis) {
                        return Ok(Node::Expr(left));
                    }
                    let right = self.parse_expr(bp::SEQ - 1)?;
                    let span = Span::merge_opt(left.span(), right.span());
                    Expression::Sequence {
                        left: Box::new(left),
                        right: Box::new(right),
                        paren_wrapped: false,
                        span,
                    }
                }

                Punct::LeftParen => self.finish_call(left)?,
                Punct::Quote => self.parse_prime(left, 1)?,
                Punct::Bang => {
                    let span = Span::merge_opt(left.span(), Some(token.span()));
                    Expression::Factorial {
                        expr: Box::new(left),
                        span,
                    }
                }
                Punct::Dot => self.parse_member(left)?,
                Punct::LeftBracket => self.parse_access(left, token.span())?,

                _ => unreachable!("token has no consequent binding power"),
            },

            TokenKind::Prime(run) => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "a prime run is bounded by the 4GB source limit"
                )]
                let order = run.len() as u32;
                self.parse_prime(left, order)?
            }

            TokenKind::Keyword(Keyword::With) => self.parse_substitution(left)?,

            _ => unreachable!("token has no consequent binding power"),
        };

        Ok(Node::Expr(expr))
    }

    /// Parses the right side of a comparison, chaining a same-direction
    /// second comparison into a double inequality.
    fn parse_comparison(
        &mut self,
        left: Expression,
        op: BinaryOp,
        is_statement_top: bool,
    ) -> ParseResult<Expression> {
        // At statement top, `=` lowers its right threshold below `,` so an
        // action sequence can follow: `A = a -> a+1, b -> b+1`.
        let right_bp = if op == BinaryOp::Eq && is_statement_top {
            bp::SEQ - 1
        } else {
            bp::REL
        };
        let right = self.parse_expr(right_bp)?;

        // `=` never participates in a double inequality.
        let second = self
            .peek_kind()
            .as_punct()
            .and_then(comparison_op)
            .filter(|op2| *op2 != BinaryOp::Eq);
        let Some(op2) = second else {
            return Ok(binary(op, left, right));
        };

        let op2_token = self.advance();
        let far = self.parse_expr(bp::REL)?;
        if op.direction() == 0 || op.direction() != op2.direction() {
            return Err(self.fatal(
                eco_format!("Cannot chain {op2} with {op}"),
                Some(op2_token.span()),
            ));
        }

        let span = Span::merge_opt(left.span(), far.span());
        Ok(Expression::DoubleInequality {
            left: Box::new(left),
            left_op: op,
            middle: Box::new(right),
            right_op: op2,
            right: Box::new(far),
            span,
        })
    }

    /// Parses `variable -> expression`.
    fn parse_update_rule(&mut self, left: Expression) -> ParseResult<Expression> {
        let left_span = left.span();
        let Expression::Identifier(variable) = left else {
            return Err(self.fatal("Left side of '->' must be an identifier", left_span));
        };
        let value = self.parse_expr(bp::UPDATE_RULE)?;
        let span = Span::merge_opt(variable.span, value.span());
        Ok(Expression::UpdateRule {
            variable,
            expr: Box::new(value),
            span,
        })
    }

    /// Parses call arguments after a consumed `(`.
    fn finish_call(&mut self, callee: Expression) -> ParseResult<Expression> {
        if !matches!(
            callee,
            Expression::Identifier(_) | Expression::Member { .. }
        ) {
            let at = callee.span();
            return Err(self.fatal("Expected a function name before '('", at));
        }

        let arguments;
        let close;
        if self.peek_kind().is_punct(Punct::RightParen) {
            arguments = Vec::new();
            close = self.advance();
        } else {
            arguments = self.parse_bare_seq()?;
            close = self.expect_punct(Punct::RightParen)?;
        }

        let span = Span::merge_opt(callee.span(), Some(close.span()));
        Ok(Expression::Call {
            callee: Box::new(callee),
            arguments,
            span,
        })
    }

    /// Parses prime notation after the first quote run: `f''(x)`.
    ///
    /// Consecutive quote tokens accumulate into the derivative order; the
    /// run must end at a call.
    fn parse_prime(&mut self, left: Expression, first_order: u32) -> ParseResult<Expression> {
        let left_span = left.span();
        if !matches!(left, Expression::Identifier(_)) {
            return Err(self.fatal("Prime notation requires a function name", left_span));
        }

        let mut order = first_order;
        loop {
            match self.peek_kind() {
                TokenKind::Prime(run) => {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "a prime run is bounded by the 4GB source limit"
                    )]
                    let run_len = run.len() as u32;
                    order += run_len;
                    self.advance();
                }
                TokenKind::Punct(Punct::Quote) => {
                    order += 1;
                    self.advance();
                }
                _ => break,
            }
        }

        self.expect_punct(Punct::LeftParen)?;
        let call = self.finish_call(left)?;
        let span = call.span();
        Ok(Expression::Prime {
            expr: Box::new(call),
            order,
            span,
        })
    }

    /// Parses `.property` member access.
    fn parse_member(&mut self, object: Expression) -> ParseResult<Expression> {
        let property_token = self.expect_identifier()?;
        let property = self.identifier_from(&property_token)?;
        let span = Span::merge_opt(object.span(), property.span);
        Ok(Expression::Member {
            object: Box::new(object),
            property,
            span,
        })
    }

    /// Parses `[...]` list access. A bracketed single element indexes
    /// directly, so `L[[1]]` collapses to `L[1]`.
    fn parse_access(&mut self, left: Expression, open: Span) -> ParseResult<Expression> {
        let list = self.parse_list_body(open)?;
        let list_span = list.span();
        let index = match list {
            Expression::List { mut values, .. } if values.len() == 1 => values
                .pop()
                .expect("list literal has exactly one element"),
            other => other,
        };
        let span = Span::merge_opt(left.span(), list_span);
        Ok(Expression::ListAccess {
            expr: Box::new(left),
            index: Box::new(index),
            span,
        })
    }

    /// Parses `with a=1, b=2` substitutions.
    fn parse_substitution(&mut self, body: Expression) -> ParseResult<Expression> {
        let items = self.parse_bare_seq()?;
        let mut assignments = Vec::with_capacity(items.len());
        for item in items {
            assignments.push(self.into_assignment(
                item,
                "Expected 'with' to be followed by assignments like 'a=1'",
            )?);
        }
        let last_span = assignments.last().and_then(|a| a.span);
        let span = Span::merge_opt(body.span(), last_span);
        Ok(Expression::Substitution {
            body: Box::new(body),
            assignments,
            span,
        })
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Reinterprets a parsed `variable = value` comparison as a binding.
    pub(super) fn into_assignment(
        &mut self,
        expr: Expression,
        context: &str,
    ) -> ParseResult<Assignment> {
        let expr_span = expr.span();
        if let Expression::Binary {
            op: BinaryOp::Eq,
            left,
            right,
            span,
        } = expr
        {
            if let Expression::Identifier(variable) = *left {
                return Ok(Assignment {
                    variable,
                    expr: *right,
                    span,
                });
            }
        }
        Err(self.fatal(context, expr_span))
    }

    /// Normalizes an identifier token into an [`Identifier`] node.
    pub(super) fn identifier_from(&mut self, token: &Token) -> ParseResult<Identifier> {
        let TokenKind::Identifier(lexeme) = token.kind() else {
            unreachable!()
        };
        let lexeme = lexeme.clone();
        self.normalize(&lexeme, token.span())
    }

    /// Applies the implicit-subscript rule, diagnosing violations.
    pub(super) fn normalize(&mut self, lexeme: &str, span: Span) -> ParseResult<Identifier> {
        match normalize_identifier(lexeme, self.names) {
            Normalization::Name(name) => Ok(Identifier::new(name, Some(span))),
            Normalization::TooManyUnderscores => {
                self.error("Identifiers may contain at most one '_'", Some(span));
                Ok(Identifier::new("error", Some(span)))
            }
            Normalization::TrailingUnderscore => {
                Err(self.fatal("Cannot end with '_'", Some(span)))
            }
            Normalization::DigitBeforeUnderscore => {
                Err(self.fatal("Digits are not allowed before '_'", Some(span)))
            }
        }
    }

    /// Decodes a string lexeme with JSON escape semantics.
    ///
    /// A lexeme that fails to decode is diagnosed and falls back to the
    /// quoted text with the quotes stripped, keeping the AST usable.
    pub(super) fn decode_string(&mut self, lexeme: &str, span: Span) -> ecow::EcoString {
        match serde_json::from_str::<String>(lexeme) {
            Ok(value) => value.into(),
            Err(_) => {
                self.error("Invalid string literal", Some(span));
                let inner = lexeme.strip_prefix('"').unwrap_or(lexeme);
                let inner = inner.strip_suffix('"').unwrap_or(inner);
                inner.into()
            }
        }
    }
}

/// Builds a piecewise branch spanning its parts.
fn branch(condition: Expression, consequent: Expression) -> PiecewiseBranch {
    let span = Span::merge_opt(condition.span(), consequent.span());
    PiecewiseBranch {
        condition,
        consequent,
        span,
    }
}
