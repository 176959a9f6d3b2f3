// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Graphling source code.
//!
//! This module contains the lexer, parser, and supporting types. The AST
//! lives in [`crate::ast`].
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s by
//! longest match over a fixed rule set. Whitespace and comments are real
//! tokens (the parser skips them), so the token stream tiles the input.
//!
//! ```
//! use graphling_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("y=x").collect();
//! assert_eq!(tokens.len(), 3); // y, =, x
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function turns a source string into a
//! [`Program`](crate::ast::Program) plus an ordered list of
//! [`Diagnostic`]s. The parser is a Pratt (binding-power) dispatcher with
//! statement-level error recovery: a fatal error abandons one statement,
//! resynchronizes at the next separator, and keeps going, so a usable AST
//! comes back even from broken input.
//!
//! # Identifier normalization
//!
//! Multi-letter identifiers implicitly subscript (`xyz` reads as `x_yz`)
//! unless they name a built-in operator or command. The exempt names are
//! injected via [`NameTable`]; see [`parse`].

mod error;
mod lexer;
mod names;
mod parser;
mod span;
mod token;

// Property-based tests for the lexer
#[cfg(test)]
mod lexer_property_tests;

pub use error::SyntaxError;
pub use lexer::{Lexer, lex, lex_with_eof};
pub use names::NameTable;
pub use parser::{Diagnostic, Severity, is_input_complete, parse};
pub use span::Span;
pub use token::{Keyword, Punct, Token, TokenKind};
