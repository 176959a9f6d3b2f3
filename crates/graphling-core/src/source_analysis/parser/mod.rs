// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pratt parser for Graphling source code.
//!
//! This parser builds an AST from the lexer's token stream. It is designed
//! for IDE use with comprehensive error recovery and diagnostics.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - the parser MUST always produce a
//!   [`Program`], however broken the input
//! - **Multiple errors** - report all errors, don't stop at the first
//! - **Statement-local failure** - a fatal error abandons only the statement
//!   under construction; parsing resynchronizes at the next separator
//! - **Precise spans** - every diagnostic points at real source bytes
//!
//! # Expression precedence (Pratt parsing)
//!
//! Operator precedence is handled with binding powers (see [`bp`]). Each
//! token that can continue an expression has a consequent binding power; the
//! main loop consumes it only while that power exceeds the caller's
//! threshold. Right-associative operators (`^`, `,`) recurse at their own
//! power minus one.
//!
//! | tokens | power |
//! |---|---|
//! | `@{` `#{` | meta |
//! | `,` | seq (right) |
//! | `<` `<=` `=` `>=` `>` | rel |
//! | `~` | sim |
//! | `->` | update rule |
//! | `with` | substitution |
//! | `+` `-` | add |
//! | `*` `/` | mul |
//! | `^` | pow (right) |
//! | `!` | postfix |
//! | `(` `'` | call |
//! | `[` | access |
//! | `.` | member |
//!
//! # Usage
//!
//! ```
//! use graphling_core::source_analysis::{parse, NameTable};
//!
//! let (program, diagnostics) = parse("y=x", &NameTable::default());
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.children.len(), 1);
//! ```

use ecow::{EcoString, eco_format};

use crate::ast::{Expression, Program, Statement};
use crate::source_analysis::{Keyword, Lexer, NameTable, Punct, Span, Token, TokenKind, lex};

// Submodules with additional impl blocks for Parser
mod expressions;
mod statements;

// Property-based tests for the parser
#[cfg(test)]
mod property_tests;

/// Binding powers, lowest to highest, with gaps so `power - 1` expresses a
/// right-associative recursion threshold.
pub(crate) mod bp {
    /// Statement top; everything binds tighter than this.
    pub const TOP: u8 = 0;
    /// Style mappings and regression parameters (`@{`, `#{`).
    pub const META: u8 = 2;
    /// Comma sequences (right-associative via `SEQ - 1`).
    pub const SEQ: u8 = 4;
    /// Comparisons (`<` `<=` `=` `>=` `>`).
    pub const REL: u8 = 6;
    /// The regression operator `~`.
    pub const SIM: u8 = 8;
    /// Action update rules (`->`).
    pub const UPDATE_RULE: u8 = 10;
    /// `with` substitutions.
    pub const SUBSTITUTION: u8 = 12;
    /// Leibniz derivatives (`(d/d x) ...`).
    pub const DERIVATIVE: u8 = 14;
    /// Additive operators.
    pub const ADD: u8 = 16;
    /// Multiplicative operators.
    pub const MUL: u8 = 18;
    /// Prefix negation.
    pub const PREFIX: u8 = 20;
    /// Exponentiation (right-associative via `POW - 1`).
    pub const POW: u8 = 22;
    /// Postfix factorial.
    pub const POSTFIX: u8 = 24;
    /// Function calls and prime notation.
    pub const CALL: u8 = 26;
    /// List access.
    pub const ACCESS: u8 = 28;
    /// Member access.
    pub const MEMBER: u8 = 30;
}

/// Gets the consequent binding power for a token, or `None` if the token
/// cannot continue an expression. A `None` ends the expression, which is
/// what lets closers like `)` and `]` terminate their operands.
fn consequent_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Punct(punct) => match punct {
            Punct::StyleOpen | Punct::RegressionOpen => Some(bp::META),
            Punct::Comma => Some(bp::SEQ),
            Punct::Lt | Punct::Le | Punct::Eq | Punct::Ge | Punct::Gt => Some(bp::REL),
            Punct::Sim => Some(bp::SIM),
            Punct::Arrow => Some(bp::UPDATE_RULE),
            Punct::Plus | Punct::Minus => Some(bp::ADD),
            Punct::Star | Punct::Slash => Some(bp::MUL),
            Punct::Caret => Some(bp::POW),
            Punct::Bang => Some(bp::POSTFIX),
            Punct::LeftParen | Punct::Quote => Some(bp::CALL),
            Punct::LeftBracket => Some(bp::ACCESS),
            Punct::Dot => Some(bp::MEMBER),
            // Closers and mixfix interior tokens terminate the expression.
            Punct::Colon
            | Punct::Ellipsis
            | Punct::DDeriv
            | Punct::RightParen
            | Punct::RightBracket
            | Punct::LeftBrace
            | Punct::RightBrace => None,
        },
        TokenKind::Prime(_) => Some(bp::CALL),
        TokenKind::Keyword(Keyword::With) => Some(bp::SUBSTITUTION),
        _ => None,
    }
}

/// Parses a source string into a program.
///
/// This is the main entry point. It always returns a [`Program`], even when
/// the input has syntax errors; check the returned diagnostics. An empty
/// diagnostics list means the whole input parsed.
///
/// `names` is the host-supplied catalogue of identifier names exempt from
/// implicit subscripting; it is only read, so one table can serve many
/// parses.
///
/// # Examples
///
/// ```
/// use graphling_core::source_analysis::{parse, NameTable};
///
/// let (program, diagnostics) = parse("f(x)=x^2", &NameTable::default());
/// assert!(diagnostics.is_empty());
/// assert_eq!(program.children.len(), 1);
/// ```
#[must_use]
pub fn parse(source: &str, names: &NameTable) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(source, names);
    let children = parser.parse_statements(true);

    if children.is_empty() && parser.diagnostics.is_empty() {
        parser.diagnostics.push(Diagnostic::warning(
            "Program is empty. Try typing: y=x",
            Some(Span::new(0, 0)),
        ));
    }

    // The statement loop only returns at end of input, but guard anyway.
    let leftover_span = parser.peek().span();
    if !parser.peek().kind().is_eof() {
        parser
            .diagnostics
            .push(Diagnostic::error("Didn't reach end", Some(leftover_span)));
    }

    (Program::new(children), parser.diagnostics)
}

/// Checks whether the given source text appears syntactically complete for
/// REPL or editor evaluation.
///
/// This is a heuristic used to decide whether to evaluate the current input
/// buffer or show a continuation prompt for multi-line input. It returns
/// `false` (incomplete) when:
///
/// - Delimiters are unclosed: `(`, `[`, `{`, `@{`, `#{`
/// - A string literal is unterminated
/// - The last token expects a following operand: a binary or comparison
///   operator, `->`, `,`, `:`, `...`, `.`, `d/d`, a lone `'`, or a keyword
///   that introduces a construct (`with`, `for`, `sum`, `table`, ...)
///
/// Extra closing delimiters are treated as complete so the caller surfaces
/// the syntax error rather than waiting forever.
///
/// # Examples
///
/// ```
/// use graphling_core::source_analysis::is_input_complete;
///
/// assert!(is_input_complete("y=x"));
/// assert!(!is_input_complete("y=x+"));       // trailing operator
/// assert!(!is_input_complete("[1, 2"));      // unclosed list
/// assert!(!is_input_complete("f(x) with "));  // substitution missing bindings
/// ```
#[must_use]
pub fn is_input_complete(source: &str) -> bool {
    if source.trim().is_empty() {
        return true;
    }

    let mut paren_depth: i32 = 0;
    let mut bracket_depth: i32 = 0;
    let mut brace_depth: i32 = 0;
    let mut last_meaningful: Option<TokenKind> = None;

    for token in lex(source) {
        match token.kind() {
            // An invalid quote is an unterminated string literal.
            TokenKind::Invalid('"') => return false,

            TokenKind::Punct(Punct::LeftParen) => paren_depth += 1,
            TokenKind::Punct(Punct::RightParen) => paren_depth -= 1,
            TokenKind::Punct(Punct::LeftBracket) => bracket_depth += 1,
            TokenKind::Punct(Punct::RightBracket) => bracket_depth -= 1,
            TokenKind::Punct(Punct::LeftBrace | Punct::StyleOpen | Punct::RegressionOpen) => {
                brace_depth += 1;
            }
            TokenKind::Punct(Punct::RightBrace) => brace_depth -= 1,
            _ => {}
        }

        if !token.kind().is_trivia() {
            last_meaningful = Some(token.into_kind());
        }
    }

    if paren_depth > 0 || bracket_depth > 0 || brace_depth > 0 {
        return false;
    }

    match last_meaningful {
        Some(TokenKind::Punct(punct)) => !matches!(
            punct,
            Punct::Lt
                | Punct::Le
                | Punct::Eq
                | Punct::Ge
                | Punct::Gt
                | Punct::Sim
                | Punct::Arrow
                | Punct::Comma
                | Punct::Colon
                | Punct::Ellipsis
                | Punct::Dot
                | Punct::Quote
                | Punct::Plus
                | Punct::Minus
                | Punct::Star
                | Punct::Slash
                | Punct::Caret
                | Punct::DDeriv
        ),
        // Every keyword except `settings` expects more input after it.
        Some(TokenKind::Keyword(keyword)) => matches!(keyword, Keyword::Settings),
        Some(TokenKind::Prime(_)) => false,
        _ => true,
    }
}

/// A diagnostic message (error or warning).
///
/// Diagnostics are appended in emission order, which is roughly source
/// order. A span is absent only for program-level diagnostics with no
/// anchoring token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The message.
    pub message: EcoString,
    /// The source location.
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A syntax error.
    Error,
    /// A warning that should be addressed.
    Warning,
}

/// The signal that abandons the statement under construction.
///
/// Pushed diagnostics survive; the value itself carries nothing. It unwinds
/// via `?` to the statement loop, the unique recovery frame, which calls
/// [`Parser::scan_to_next_statement`] and resumes. Panics are never caught,
/// so non-parse failures propagate normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseAbort;

pub(crate) type ParseResult<T> = Result<T, ParseAbort>;

/// Deeply nested input aborts rather than overflowing the stack.
const MAX_NESTING_DEPTH: u32 = 256;

/// Either side of the expression/statement divide.
///
/// Most parselets produce expressions, but `@{` and `#{` finalize their left
/// operand into a statement mid-expression; the main loop carries whichever
/// it has.
#[derive(Debug)]
pub(crate) enum Node {
    Expr(Expression),
    Stmt(Statement),
}

impl Node {
    pub(crate) fn span(&self) -> Option<Span> {
        match self {
            Self::Expr(expr) => expr.span(),
            Self::Stmt(stmt) => stmt.span(),
        }
    }
}

/// The parser state: the lexer, a one-token lookahead slot, and the
/// diagnostics buffer.
pub(crate) struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// One-token lookahead, filled by `peek`.
    peeked: Option<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Names exempt from implicit subscripting.
    names: &'src NameTable,
    /// Current expression nesting depth.
    depth: u32,
}

impl<'src> Parser<'src> {
    /// Creates a new parser over the given source.
    fn new(source: &'src str, names: &'src NameTable) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
            diagnostics: Vec::new(),
            names,
            depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Pulls the next significant token from the lexer, skipping whitespace
    /// and comments and diagnosing invalid characters.
    fn pull(&mut self) -> Token {
        loop {
            let Some(token) = self.lexer.next() else {
                return self.lexer.eof_token();
            };
            match token.kind() {
                TokenKind::Space(_) | TokenKind::Comment(_) => {}
                TokenKind::Invalid(c) => {
                    let message = eco_format!("Invalid character '{c}'");
                    self.diagnostics
                        .push(Diagnostic::error(message, Some(token.span())));
                }
                _ => return token,
            }
        }
    }

    /// Returns the next significant token without consuming it.
    fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let token = self.pull();
            self.peeked = Some(token);
        }
        self.peeked
            .as_ref()
            .expect("lookahead slot was just filled")
    }

    /// Returns a clone of the next significant token's kind.
    ///
    /// Cloning is cheap ([`TokenKind`] payloads are [`EcoString`]s) and
    /// frees the caller to mutate the parser inside a `match`.
    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind().clone()
    }

    /// Consumes and returns the next significant token.
    fn advance(&mut self) -> Token {
        if let Some(token) = self.peeked.take() {
            return token;
        }
        self.pull()
    }

    /// Consumes tokens until one satisfies `matches_kind`.
    ///
    /// The first mismatch is diagnosed ("Expected X but got Y. Skipping
    /// it."); further mismatches are skipped silently. Reaching the end of
    /// input is fatal.
    fn expect_matching(
        &mut self,
        what: &str,
        matches_kind: impl Fn(&TokenKind) -> bool,
    ) -> ParseResult<Token> {
        let mut reported = false;
        loop {
            let token = self.advance();
            if matches_kind(token.kind()) {
                return Ok(token);
            }
            if token.kind().is_eof() {
                return Err(self.fatal(
                    eco_format!("Expected {what} but reached the end of the input"),
                    Some(token.span()),
                ));
            }
            if !reported {
                self.error(
                    eco_format!("Expected {what} but got '{token}'. Skipping it."),
                    Some(token.span()),
                );
                reported = true;
            }
        }
    }

    /// Consumes the given punctuation, skipping ahead if necessary.
    fn expect_punct(&mut self, punct: Punct) -> ParseResult<Token> {
        let what = eco_format!("'{}'", punct.as_str());
        self.expect_matching(&what, |kind| kind.is_punct(punct))
    }

    /// Consumes an identifier token, skipping ahead if necessary.
    fn expect_identifier(&mut self) -> ParseResult<Token> {
        self.expect_matching("an identifier", |kind| {
            matches!(kind, TokenKind::Identifier(_))
        })
    }

    /// Consumes a string token, skipping ahead if necessary.
    fn expect_string(&mut self) -> ParseResult<Token> {
        self.expect_matching("a string", |kind| matches!(kind, TokenKind::String(_)))
    }

    /// Consumes a statement separator, skipping ahead if necessary.
    fn expect_semi(&mut self) -> ParseResult<Token> {
        self.expect_matching("';'", |kind| matches!(kind, TokenKind::Semi))
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error diagnostic.
    fn error(&mut self, message: impl Into<EcoString>, span: Option<Span>) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Reports an error diagnostic and returns the statement-abort signal.
    ///
    /// Callers write `return Err(self.fatal(...))` or chain with `?`.
    #[must_use]
    fn fatal(&mut self, message: impl Into<EcoString>, span: Option<Span>) -> ParseAbort {
        self.diagnostics.push(Diagnostic::error(message, span));
        ParseAbort
    }

    /// Discards tokens up to and including the next statement separator.
    ///
    /// Used only by the statement loop's recovery path, after a fatal error
    /// unwound the current statement.
    fn scan_to_next_statement(&mut self) {
        loop {
            let token = self.advance();
            match token.kind() {
                TokenKind::Semi | TokenKind::Eof => return,
                _ => {}
            }
        }
    }

    /// Enters one level of expression nesting, aborting if the input is
    /// pathologically deep.
    fn enter_nesting(&mut self, span: Span) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.fatal("Nesting too deep", Some(span)));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of expression nesting.
    fn leave_nesting(&mut self) {
        self.depth -= 1;
    }
}
