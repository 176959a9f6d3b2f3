// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Graphling parser.
//!
//! These verify the recovery contract over generated inputs:
//!
//! 1. **Parse always returns** — no panic, whatever the input
//! 2. **Spans stay in bounds** — every node span lies within the source
//! 3. **Parents envelope children** — a node's span contains its children's
//! 4. **Identifiers are normalized** — at most one `_`, never trailing
//! 5. **Double inequalities are directed** — both operators share a
//!    non-zero direction
//! 6. **Empty input warns** — `""` yields exactly the empty-program warning

use proptest::prelude::*;

use crate::ast::{Expression, PiecewiseBranch, Program, Statement};
use crate::source_analysis::{NameTable, Severity, Span, parse};

// ============================================================================
// Span/shape walkers
// ============================================================================

/// Asserts that `child` (when present) lies within `parent` (when present).
fn check_containment(parent: Option<Span>, child: Option<Span>, what: &str) {
    if let (Some(parent), Some(child)) = (parent, child) {
        assert!(
            parent.contains(child),
            "{what}: parent span {parent:?} does not contain child span {child:?}"
        );
    }
}

fn walk_program(program: &Program, source_len: u32) {
    if let Some(span) = program.span {
        assert!(span.start() <= span.end());
        assert!(span.end() <= source_len);
    }
    for statement in &program.children {
        check_containment(program.span, statement.span(), "program/statement");
        walk_statement(statement, source_len);
    }
}

fn walk_statement(statement: &Statement, source_len: u32) {
    if let Some(span) = statement.span() {
        assert!(span.start() <= span.end());
        assert!(span.end() <= source_len);
    }
    match statement {
        Statement::Expr(stmt) => {
            check_containment(stmt.span, stmt.expr.span(), "statement/expr");
            walk_expression(&stmt.expr, source_len);
            if let Some(residual) = &stmt.residual_variable {
                check_containment(stmt.span, residual.span, "statement/residual");
            }
        }
        Statement::Table { columns, .. } => {
            for column in columns {
                check_containment(statement.span(), column.span, "table/column");
                walk_expression(&column.expr, source_len);
            }
        }
        Statement::Folder { children, .. } => {
            for child in children {
                check_containment(statement.span(), child.span(), "folder/child");
                walk_statement(child, source_len);
            }
        }
        Statement::Ticker { handler, .. } => {
            check_containment(statement.span(), handler.span(), "ticker/handler");
            walk_expression(handler, source_len);
        }
        Statement::Text { .. } | Statement::Image { .. } | Statement::Settings { .. } => {}
    }
}

fn walk_expression(expr: &Expression, source_len: u32) {
    if let Some(span) = expr.span() {
        assert!(span.start() <= span.end());
        assert!(span.end() <= source_len);
    }

    let parent = expr.span();
    let check_child = |child: &Expression| {
        check_containment(parent, child.span(), "expression/child");
        walk_expression(child, source_len);
    };

    match expr {
        Expression::Number { .. } | Expression::String { .. } => {}
        Expression::Identifier(id) => {
            let underscores = id.name.matches('_').count();
            assert!(underscores <= 1, "identifier {:?} re-subscripted", id.name);
            assert!(!id.name.ends_with('_'), "identifier {:?} ends in '_'", id.name);
        }
        Expression::Negate { expr, .. } | Expression::Factorial { expr, .. } => check_child(expr),
        Expression::Binary { left, right, .. } => {
            check_child(left);
            check_child(right);
        }
        Expression::DoubleInequality {
            left,
            left_op,
            middle,
            right_op,
            right,
            ..
        } => {
            assert_eq!(
                left_op.direction(),
                right_op.direction(),
                "double inequality operators disagree"
            );
            assert_ne!(left_op.direction(), 0, "double inequality through '='");
            check_child(left);
            check_child(middle);
            check_child(right);
        }
        Expression::Sequence { left, right, .. } => {
            check_child(left);
            check_child(right);
        }
        Expression::Range {
            start_values,
            end_values,
            ..
        } => {
            for value in start_values.iter().chain(end_values) {
                check_child(value);
            }
        }
        Expression::List { values, .. } => {
            for value in values {
                check_child(value);
            }
        }
        Expression::ListComprehension {
            expr, assignments, ..
        } => {
            assert!(!assignments.is_empty(), "comprehension with no bindings");
            check_child(expr);
            for assignment in assignments {
                check_child(&assignment.expr);
            }
        }
        Expression::ListAccess { expr, index, .. } => {
            check_child(expr);
            check_child(index);
        }
        Expression::Member { object, .. } => check_child(object),
        Expression::Call {
            callee, arguments, ..
        } => {
            assert!(
                matches!(
                    **callee,
                    Expression::Identifier(_) | Expression::Member { .. }
                ),
                "call through a non-name"
            );
            check_child(callee);
            for argument in arguments {
                check_child(argument);
            }
        }
        Expression::Prime { expr, .. } => {
            assert!(matches!(**expr, Expression::Call { .. }));
            check_child(expr);
        }
        Expression::Derivative { expr, .. } => check_child(expr),
        Expression::Repeated {
            start, end, expr, ..
        } => {
            check_child(start);
            check_child(end);
            check_child(expr);
        }
        Expression::Piecewise { branches, .. } => {
            for PiecewiseBranch {
                condition,
                consequent,
                ..
            } in branches
            {
                assert!(
                    condition.is_comparison(),
                    "piecewise condition is not a comparison: {condition:?}"
                );
                check_child(condition);
                check_child(consequent);
            }
        }
        Expression::UpdateRule { expr, .. } => check_child(expr),
        Expression::Substitution {
            body, assignments, ..
        } => {
            check_child(body);
            for assignment in assignments {
                check_child(&assignment.expr);
            }
        }
        Expression::StyleMapping(mapping) => {
            for entry in &mapping.entries {
                check_containment(mapping.span, entry.expr.span(), "mapping/entry");
                walk_expression(&entry.expr, source_len);
            }
        }
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Statements that should parse without diagnostics.
const VALID_STATEMENTS: &[&str] = &[
    "y=x",
    "f(x)=x^2+1",
    "a^b^c",
    "-x^2",
    "{x>3:5, x<=0:-1, x}",
    "[a+b for a=[0,5,10], b=[1...5]]",
    "y1 ~ m*x1+b #{ m=1.5, b=2.3 }",
    "e1 = a ~ b",
    "1 <= x < -y",
    "L[1,2]",
    "L[M]",
    "P.x",
    "f''(x)",
    "y=(d/d x) x^2",
    "s=sum i=(1...10) i^2",
    "q=product i=(1...4) i",
    "g=integral t=(0...1) t^2",
    "\"a note\"",
    "image \"logo\"",
    "settings @{ randomSeed: 5 }",
    "table { x1=[1,2]; y1=[3,4] }",
    "folder \"stuff\" { y=x }",
    "ticker a -> a+1",
    "A = a -> a+1, b -> b+1",
    "y=f(x) with a=1, b=2",
];

fn valid_statement() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_STATEMENTS).prop_map(std::string::ToString::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Property 1: parse always returns, whatever the input.
    #[test]
    fn parse_never_panics(input in "\\PC{0,400}") {
        let names = NameTable::default();
        let (_program, _diagnostics) = parse(&input, &names);
    }

    /// Property 1b: parse survives hostile punctuation soup, including deep
    /// nesting, without panicking or overflowing the stack.
    #[test]
    fn parse_survives_punctuation_soup(input in "[(){}\\[\\],:;=<>~^'!+*/@#. \\n-]{0,400}") {
        let names = NameTable::default();
        let (_program, _diagnostics) = parse(&input, &names);
    }

    /// Properties 2-5: spans in bounds and nested, identifiers normalized,
    /// double inequalities directed, on arbitrary input.
    #[test]
    fn ast_invariants_hold(input in "\\PC{0,400}") {
        let names = NameTable::default();
        let (program, _diagnostics) = parse(&input, &names);
        let source_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        walk_program(&program, source_len);
    }

    /// The same invariants on known-good statement sequences, which reach
    /// much deeper into the grammar than random bytes do.
    #[test]
    fn ast_invariants_hold_on_valid_programs(
        statements in prop::collection::vec(valid_statement(), 1..6)
    ) {
        let input = statements.join(";\n");
        let names = NameTable::default();
        let (program, diagnostics) = parse(&input, &names);
        prop_assert!(
            diagnostics.is_empty(),
            "diagnostics for {input:?}: {diagnostics:?}"
        );
        prop_assert_eq!(program.children.len(), statements.len());
        let source_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        walk_program(&program, source_len);
    }

    /// Parsing is deterministic.
    #[test]
    fn parse_is_deterministic(input in "\\PC{0,400}") {
        let names = NameTable::default();
        let (first_program, first_diagnostics) = parse(&input, &names);
        let (second_program, second_diagnostics) = parse(&input, &names);
        prop_assert_eq!(first_program, second_program);
        prop_assert_eq!(first_diagnostics, second_diagnostics);
    }
}

#[test]
fn empty_input_yields_exactly_the_empty_warning() {
    let names = NameTable::default();
    let (program, diagnostics) = parse("", &names);
    assert!(program.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].message, "Program is empty. Try typing: y=x");
    assert_eq!(diagnostics[0].span, Some(Span::new(0, 0)));
}

#[test]
fn whitespace_only_input_also_warns() {
    let names = NameTable::default();
    let (program, diagnostics) = parse("  \n\n  ", &names);
    assert!(program.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}
