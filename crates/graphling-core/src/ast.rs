// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Graphling.
//!
//! The AST represents the structure of a Graphling program after parsing.
//! A [`Program`] is a list of [`Statement`]s; most statements wrap an
//! [`Expression`], and tables, folders, and tickers nest further structure.
//!
//! # Design Philosophy
//!
//! This AST is designed for IDE tooling first:
//!
//! - **Best-effort trees** - the parser recovers at statement boundaries, so
//!   a program with errors still yields the statements that did parse
//! - **Optional spans** - nodes synthesized during parsing (the implicit `1`
//!   consequent of a shorthand piecewise branch, the sentinel `else`
//!   identifier) carry no span; every node parsed from source does
//! - **Immutable once built** - nodes are produced bottom-up and parents own
//!   their children exclusively
//!
//! # Example
//!
//! ```
//! use graphling_core::ast::{BinaryOp, Expression, Statement};
//! use graphling_core::source_analysis::{parse, NameTable};
//!
//! let (program, diagnostics) = parse("y=x", &NameTable::default());
//! assert!(diagnostics.is_empty());
//! let Statement::Expr(stmt) = &program.children[0] else {
//!     panic!("expected an expression statement");
//! };
//! assert!(matches!(
//!     stmt.expr,
//!     Expression::Binary { op: BinaryOp::Eq, .. }
//! ));
//! ```

use std::fmt;

use ecow::EcoString;

use crate::source_analysis::Span;

/// Top-level container for a parsed Graphling program.
///
/// The program owns the entire tree; every statement is reachable from
/// `children`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements of the program, in source order.
    pub children: Vec<Statement>,
    /// Envelope of the children's spans, if any child has one.
    pub span: Option<Span>,
}

impl Program {
    /// Creates a program from its statements, computing the span envelope.
    #[must_use]
    pub fn new(children: Vec<Statement>) -> Self {
        let span = children
            .iter()
            .fold(None, |acc, child| Span::merge_opt(acc, child.span()));
        Self { children, span }
    }

    /// Returns `true` if the program has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// An expression in statement position, together with its attachments.
///
/// Carries the optional style mapping (`@{ ... }`), regression parameters
/// (`#{ ... }`), and the residual variable of a regression written as
/// `e1 = a ~ b` (where `e1` names the residuals and the statement's
/// expression is the `~` itself).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStatement {
    /// The expression.
    pub expr: Expression,
    /// Style attached with `@{ ... }`.
    pub style: Option<StyleMapping>,
    /// Regression parameters attached with `#{ ... }`.
    pub parameters: Option<RegressionParameters>,
    /// The residual variable of a named regression.
    pub residual_variable: Option<Identifier>,
    /// Source location.
    pub span: Option<Span>,
}

impl ExprStatement {
    /// Creates a bare expression statement with no attachments.
    #[must_use]
    pub fn bare(expr: Expression) -> Self {
        let span = expr.span();
        Self {
            expr,
            style: None,
            parameters: None,
            residual_variable: None,
            span,
        }
    }
}

/// A single top-level (or folder/table-nested) item.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression item: `y=x`, `f(x)=x^2`, `y1 ~ m*x1+b`.
    Expr(ExprStatement),

    /// A text note: `"any comment"`.
    Text {
        /// The decoded text.
        text: EcoString,
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },

    /// A table of columns: `table { x1=[1,2]; y1=[3,4] }`.
    Table {
        /// The column definitions. Only expression statements survive
        /// parsing; anything else is diagnosed and dropped.
        columns: Vec<ExprStatement>,
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },

    /// An image placeholder: `image "name"`.
    Image {
        /// The decoded image name.
        name: EcoString,
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },

    /// A folder grouping statements: `folder "title" { ... }`.
    Folder {
        /// The decoded folder title.
        title: EcoString,
        /// The statements inside the folder.
        children: Vec<Statement>,
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },

    /// Graph settings: `settings @{ ... }`.
    Settings {
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },

    /// A ticker: `ticker a -> a+1 @{ minStep: 100 }`.
    Ticker {
        /// The action run on each tick.
        handler: Expression,
        /// Style attached with `@{ ... }`.
        style: Option<StyleMapping>,
        /// Source location.
        span: Option<Span>,
    },
}

impl Statement {
    /// Returns the span of this statement, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Expr(stmt) => stmt.span,
            Self::Text { span, .. }
            | Self::Table { span, .. }
            | Self::Image { span, .. }
            | Self::Folder { span, .. }
            | Self::Settings { span, .. }
            | Self::Ticker { span, .. } => *span,
        }
    }

    /// Returns the attached style mapping, if any.
    #[must_use]
    pub fn style(&self) -> Option<&StyleMapping> {
        match self {
            Self::Expr(stmt) => stmt.style.as_ref(),
            Self::Text { style, .. }
            | Self::Table { style, .. }
            | Self::Image { style, .. }
            | Self::Folder { style, .. }
            | Self::Settings { style, .. }
            | Self::Ticker { style, .. } => style.as_ref(),
        }
    }

    /// Attaches a style mapping, widening the statement span over it.
    /// A later mapping replaces an earlier one.
    pub(crate) fn set_style(&mut self, mapping: StyleMapping) {
        let mapping_span = mapping.span;
        match self {
            Self::Expr(stmt) => {
                stmt.span = Span::merge_opt(stmt.span, mapping_span);
                stmt.style = Some(mapping);
                return;
            }
            Self::Text { style, span, .. }
            | Self::Table { style, span, .. }
            | Self::Image { style, span, .. }
            | Self::Folder { style, span, .. }
            | Self::Settings { style, span, .. }
            | Self::Ticker { style, span, .. } => {
                *span = Span::merge_opt(*span, mapping_span);
                *style = Some(mapping);
            }
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `~`, the regression operator
    Sim,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl BinaryOp {
    /// Returns the source spelling of this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Sim => "~",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }

    /// Returns `true` for the comparison operators `< <= = >= >`.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Eq | Self::Ge | Self::Gt)
    }

    /// The direction of a comparison: `1` for `<`/`<=`, `-1` for `>`/`>=`,
    /// `0` otherwise. Double inequalities require both operators to share a
    /// non-zero direction.
    #[must_use]
    pub const fn direction(self) -> i8 {
        match self {
            Self::Lt | Self::Le => 1,
            Self::Gt | Self::Ge => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A big-operator form: `sum`, `product`, or `integral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatedOp {
    /// `sum`
    Sum,
    /// `product`
    Product,
    /// `integral`
    Integral,
}

impl RepeatedOp {
    /// Returns the source spelling of this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Product => "product",
            Self::Integral => "integral",
        }
    }
}

impl fmt::Display for RepeatedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier, already normalized by the implicit-subscript rule.
///
/// The name matches `[A-Za-z]+` or `[A-Za-z]+_[A-Za-z0-9]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The normalized name.
    pub name: EcoString,
    /// Source location; `None` for synthesized identifiers such as `else`.
    pub span: Option<Span>,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// One branch of a piecewise expression.
///
/// The condition is a comparison (or the sentinel `else` identifier); the
/// consequent defaults to the constant `1` when written as a bare condition.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseBranch {
    /// The branch condition.
    pub condition: Expression,
    /// The branch value.
    pub consequent: Expression,
    /// Source location.
    pub span: Option<Span>,
}

/// A style mapping: `@{ key: value, ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMapping {
    /// The entries, in source order.
    pub entries: Vec<MappingEntry>,
    /// Source location including the delimiters.
    pub span: Option<Span>,
}

/// One `key: value` entry of a style mapping.
///
/// The property name is the raw key text; style keys are never subscripted.
/// The value is any expression, including a nested [`StyleMapping`]
/// expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    /// The property name.
    pub property: EcoString,
    /// The value.
    pub expr: Expression,
    /// Source location.
    pub span: Option<Span>,
}

/// Regression parameters: `#{ m=1.5, b=2.3 }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionParameters {
    /// The entries, in source order.
    pub entries: Vec<RegressionEntry>,
    /// Source location including the delimiters.
    pub span: Option<Span>,
}

/// One `name=value` entry of a regression parameter block.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionEntry {
    /// The parameter being fitted.
    pub variable: Identifier,
    /// Its value.
    pub value: Expression,
    /// Source location.
    pub span: Option<Span>,
}

/// A `variable = expression` binding, as used by list comprehensions
/// (`[a+b for a=[1,2]]`) and substitutions (`f(x) with a=3`).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The bound variable.
    pub variable: Identifier,
    /// The bound value.
    pub expr: Expression,
    /// Source location.
    pub span: Option<Span>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A numeric literal.
    Number {
        /// The IEEE-754 double value.
        value: f64,
        /// Source location.
        span: Option<Span>,
    },

    /// An identifier reference.
    Identifier(Identifier),

    /// A string literal (decoded).
    String {
        /// The decoded text.
        value: EcoString,
        /// Source location.
        span: Option<Span>,
    },

    /// Unary negation: `-x`.
    Negate {
        /// The operand.
        expr: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// Postfix factorial: `n!`.
    Factorial {
        /// The operand.
        expr: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        left: Box<Expression>,
        /// The right operand.
        right: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A double inequality: `1 <= x < 5`. Both operators point the same
    /// way and neither is `=`.
    DoubleInequality {
        /// The leftmost operand.
        left: Box<Expression>,
        /// The first operator.
        left_op: BinaryOp,
        /// The middle operand.
        middle: Box<Expression>,
        /// The second operator.
        right_op: BinaryOp,
        /// The rightmost operand.
        right: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A comma pair: `(a, b)`. Sequences nest to the right, and
    /// `paren_wrapped` records whether the pair was written in parentheses
    /// (a point literal) or bare (an action sequence).
    Sequence {
        /// The first element.
        left: Box<Expression>,
        /// The second element (possibly itself a sequence).
        right: Box<Expression>,
        /// Whether the sequence was wrapped in parentheses.
        paren_wrapped: bool,
        /// Source location.
        span: Option<Span>,
    },

    /// A range literal: `[1...10]` or `[1, 2, ..., 10]`.
    Range {
        /// The values before the ellipsis.
        start_values: Vec<Expression>,
        /// The values after the ellipsis.
        end_values: Vec<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A list literal: `[1, 2, 3]`.
    List {
        /// The elements.
        values: Vec<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A list comprehension: `[a+b for a=[1,2], b=[3,4]]`.
    ListComprehension {
        /// The element expression.
        expr: Box<Expression>,
        /// The comprehension bindings; never empty.
        assignments: Vec<Assignment>,
        /// Source location.
        span: Option<Span>,
    },

    /// Indexing or filtering: `L[1]`, `L[M]`, `L[1...5]`.
    ListAccess {
        /// The list being accessed.
        expr: Box<Expression>,
        /// The index expression. A bracketed single element is unwrapped,
        /// so `L[[1]]` and `L[1]` produce the same index.
        index: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// Member access: `P.x`, `L.random`.
    Member {
        /// The object.
        object: Box<Expression>,
        /// The member name.
        property: Identifier,
        /// Source location.
        span: Option<Span>,
    },

    /// A function call: `f(x)`, `L.random(5)`.
    Call {
        /// The callee; always an identifier or member access.
        callee: Box<Expression>,
        /// The arguments.
        arguments: Vec<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// Prime-notation derivative call: `f''(x)`.
    Prime {
        /// The underlying call.
        expr: Box<Expression>,
        /// The number of primes.
        order: u32,
        /// Source location.
        span: Option<Span>,
    },

    /// A Leibniz derivative: `(d/d x) f(x)`.
    Derivative {
        /// The differentiated expression.
        expr: Box<Expression>,
        /// The differentiation variable.
        variable: Identifier,
        /// Source location.
        span: Option<Span>,
    },

    /// A big operator: `sum i=(1...10) i^2`.
    Repeated {
        /// Which operator.
        op: RepeatedOp,
        /// The bound index variable.
        index: Identifier,
        /// The lower bound.
        start: Box<Expression>,
        /// The upper bound.
        end: Box<Expression>,
        /// The summand/factor/integrand.
        expr: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A piecewise expression: `{x > 3: 5, x}`.
    Piecewise {
        /// The branches, in source order.
        branches: Vec<PiecewiseBranch>,
        /// Source location.
        span: Option<Span>,
    },

    /// An action update rule: `a -> a+1`.
    UpdateRule {
        /// The updated variable.
        variable: Identifier,
        /// The new value.
        expr: Box<Expression>,
        /// Source location.
        span: Option<Span>,
    },

    /// A substitution: `f(x) with a=3, b=4`.
    Substitution {
        /// The expression the bindings apply to.
        body: Box<Expression>,
        /// The bindings.
        assignments: Vec<Assignment>,
        /// Source location.
        span: Option<Span>,
    },

    /// A style mapping in expression position (the value of a nested style
    /// entry).
    StyleMapping(StyleMapping),
}

impl Expression {
    /// Returns the span of this expression, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Number { span, .. }
            | Self::String { span, .. }
            | Self::Negate { span, .. }
            | Self::Factorial { span, .. }
            | Self::Binary { span, .. }
            | Self::DoubleInequality { span, .. }
            | Self::Sequence { span, .. }
            | Self::Range { span, .. }
            | Self::List { span, .. }
            | Self::ListComprehension { span, .. }
            | Self::ListAccess { span, .. }
            | Self::Member { span, .. }
            | Self::Call { span, .. }
            | Self::Prime { span, .. }
            | Self::Derivative { span, .. }
            | Self::Repeated { span, .. }
            | Self::Piecewise { span, .. }
            | Self::UpdateRule { span, .. }
            | Self::Substitution { span, .. } => *span,
            Self::Identifier(id) => id.span,
            Self::StyleMapping(mapping) => mapping.span,
        }
    }

    /// Replaces the span of this expression (used when parentheses widen a
    /// node without changing its shape).
    #[must_use]
    pub(crate) fn with_span(mut self, new_span: Option<Span>) -> Self {
        match &mut self {
            Self::Number { span, .. }
            | Self::String { span, .. }
            | Self::Negate { span, .. }
            | Self::Factorial { span, .. }
            | Self::Binary { span, .. }
            | Self::DoubleInequality { span, .. }
            | Self::Sequence { span, .. }
            | Self::Range { span, .. }
            | Self::List { span, .. }
            | Self::ListComprehension { span, .. }
            | Self::ListAccess { span, .. }
            | Self::Member { span, .. }
            | Self::Call { span, .. }
            | Self::Prime { span, .. }
            | Self::Derivative { span, .. }
            | Self::Repeated { span, .. }
            | Self::Piecewise { span, .. }
            | Self::UpdateRule { span, .. }
            | Self::Substitution { span, .. } => *span = new_span,
            Self::Identifier(id) => id.span = new_span,
            Self::StyleMapping(mapping) => mapping.span = new_span,
        }
        self
    }

    /// Returns `true` if this expression can stand as a piecewise condition:
    /// a comparison, a double inequality, or the sentinel `else`.
    #[must_use]
    pub fn is_comparison(&self) -> bool {
        match self {
            Self::Binary { op, .. } => op.is_comparison(),
            Self::DoubleInequality { .. } => true,
            Self::Identifier(id) => id.name == "else",
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_span_is_the_child_envelope() {
        let a = Statement::Text {
            text: "a".into(),
            style: None,
            span: Some(Span::new(0, 3)),
        };
        let b = Statement::Settings {
            style: None,
            span: Some(Span::new(5, 13)),
        };
        let program = Program::new(vec![a, b]);
        assert_eq!(program.span, Some(Span::new(0, 13)));

        let empty = Program::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.span, None);
    }

    #[test]
    fn binary_op_directions() {
        assert_eq!(BinaryOp::Lt.direction(), 1);
        assert_eq!(BinaryOp::Le.direction(), 1);
        assert_eq!(BinaryOp::Gt.direction(), -1);
        assert_eq!(BinaryOp::Ge.direction(), -1);
        assert_eq!(BinaryOp::Eq.direction(), 0);
        assert_eq!(BinaryOp::Add.direction(), 0);
    }

    #[test]
    fn comparison_predicate() {
        let cmp = Expression::Binary {
            op: BinaryOp::Lt,
            left: Box::new(Expression::Number {
                value: 1.0,
                span: None,
            }),
            right: Box::new(Expression::Number {
                value: 2.0,
                span: None,
            }),
            span: None,
        };
        assert!(cmp.is_comparison());

        let sum = Expression::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expression::Number {
                value: 1.0,
                span: None,
            }),
            right: Box::new(Expression::Number {
                value: 2.0,
                span: None,
            }),
            span: None,
        };
        assert!(!sum.is_comparison());

        assert!(Expression::Identifier(Identifier::new("else", None)).is_comparison());
        assert!(!Expression::Identifier(Identifier::new("x", None)).is_comparison());
    }

    #[test]
    fn with_span_replaces_any_variant_span() {
        let widened = Expression::Identifier(Identifier::new("x", Some(Span::new(1, 2))))
            .with_span(Some(Span::new(0, 3)));
        assert_eq!(widened.span(), Some(Span::new(0, 3)));
    }

    #[test]
    fn set_style_widens_statement_span() {
        let mut stmt = Statement::Settings {
            style: None,
            span: Some(Span::new(0, 8)),
        };
        stmt.set_style(StyleMapping {
            entries: Vec::new(),
            span: Some(Span::new(9, 13)),
        });
        assert_eq!(stmt.span(), Some(Span::new(0, 13)));
        assert!(stmt.style().is_some());
    }
}
