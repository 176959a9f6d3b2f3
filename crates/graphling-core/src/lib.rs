// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Graphling language core.
//!
//! Graphling is a small expression-oriented language for describing
//! mathematical graphs: expressions and equations, piecewise definitions,
//! lists and ranges, tables, folders, images, tickers, and regressions,
//! each optionally carrying presentation style.
//!
//! This crate is the text front end: a lexer and Pratt parser that turn a
//! source string into a typed AST plus an ordered list of diagnostics. It
//! is designed as a language service, so the parser never gives up on the
//! first error: it recovers at statement boundaries and always returns a
//! best-effort [`ast::Program`] for downstream tooling (analysis, gutters,
//! editor feedback).
//!
//! # Quick start
//!
//! ```
//! use graphling_core::prelude::*;
//!
//! let names = NameTable::new(["sin", "cos"], ["mean", "total"]);
//! let (program, diagnostics) = parse("f(x) = sin(x) + 1", &names);
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.children.len(), 1);
//! ```

pub mod ast;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{
        BinaryOp, ExprStatement, Expression, Identifier, Program, Statement, StyleMapping,
    };
    pub use crate::source_analysis::{
        Diagnostic, NameTable, Severity, Span, is_input_complete, parse,
    };
}
