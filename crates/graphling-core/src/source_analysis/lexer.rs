// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Graphling source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and IDE features.
//!
//! # Design Principles
//!
//! - **Longest match**: every rule is tried at the current offset and the
//!   longest match wins; ties go to the earlier rule. This is what makes
//!   `<=` win over `<`, `...` over `.`, `d/d` over the identifier `d`, and
//!   `.5` lex as a number rather than a dot.
//! - **Error recovery**: never fail on malformed input; a code unit no rule
//!   accepts becomes a one-character [`TokenKind::Invalid`] token.
//! - **Nothing is discarded**: whitespace and comments are yielded as
//!   ordinary tokens so that every byte of the input is covered by exactly
//!   one token.
//!
//! # Statement separators
//!
//! A literal `;` is a [`TokenKind::Semi`]. So is a whitespace run containing
//! two or more newlines, which lets a blank line end a statement without any
//! punctuation.
//!
//! # Example
//!
//! ```
//! use graphling_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("y = x").collect();
//! assert_eq!(tokens.len(), 5); // y, space, =, space, x
//! ```

use ecow::EcoString;

use super::{Punct, Span, Token, TokenKind};

/// Fixed punctuation spellings, longest first so a simple prefix scan
/// implements longest-match.
const PUNCT_TABLE: &[(&str, Punct)] = &[
    ("...", Punct::Ellipsis),
    ("d/d", Punct::DDeriv),
    ("<=", Punct::Le),
    (">=", Punct::Ge),
    ("->", Punct::Arrow),
    ("@{", Punct::StyleOpen),
    ("#{", Punct::RegressionOpen),
    ("<", Punct::Lt),
    ("=", Punct::Eq),
    (">", Punct::Gt),
    ("~", Punct::Sim),
    (",", Punct::Comma),
    (":", Punct::Colon),
    (".", Punct::Dot),
    ("'", Punct::Quote),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("^", Punct::Caret),
    ("!", Punct::Bang),
    ("(", Punct::LeftParen),
    (")", Punct::RightParen),
    ("[", Punct::LeftBracket),
    ("]", Punct::RightBracket),
    ("{", Punct::LeftBrace),
    ("}", Punct::RightBrace),
];

/// A lexer that tokenizes Graphling source code.
///
/// Implements [`Iterator`]; the iterator ends after the last real token
/// without yielding an end-of-input marker. Use [`lex_with_eof`] or
/// [`Lexer::eof_token`] when a terminator token is wanted.
#[derive(Debug)]
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Current byte position in source.
    position: usize,
    /// 1-based line of the current position.
    line: u32,
    /// 1-based column (in characters) of the current position.
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Returns the unlexed remainder of the source.
    fn remaining(&self) -> &'src str {
        &self.source[self.position..]
    }

    /// Synthesizes an end-of-input token at the current position.
    #[must_use]
    pub fn eof_token(&self) -> Token {
        let at = self.current_position();
        Token::new(TokenKind::Eof, Span::new(at, at), self.line, self.column, 0)
    }

    /// Advances line/column bookkeeping over the given token text.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "token text is bounded by the 4GB source limit"
    )]
    fn track_lines(&mut self, text: &str) -> u32 {
        let breaks = text.matches('\n').count() as u32;
        if let Some(idx) = text.rfind('\n') {
            self.line += breaks;
            self.column = text[idx + 1..].chars().count() as u32 + 1;
        } else {
            self.column += text.chars().count() as u32;
        }
        breaks
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }

        let (kind, len) = scan_token(rest);
        let start = self.current_position();
        let text = &rest[..len];
        let line = self.line;
        let column = self.column;

        let line_breaks = self.track_lines(text);
        self.position += len;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "source files over 4GB are not supported"
        )]
        let span = Span::new(start, start + len as u32);
        Some(Token::new(kind, span, line, column, line_breaks))
    }
}

/// Tokenizes the entire source, without a trailing end-of-input token.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenizes the entire source and appends an end-of-input token.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens: Vec<Token> = (&mut lexer).collect();
    tokens.push(lexer.eof_token());
    tokens
}

/// Scans one token at the start of `rest`, which must be non-empty.
///
/// Tries every rule and keeps the longest match; on equal length the rule
/// listed first wins (so a lone `'` is punctuation, not a prime run, and a
/// two-newline whitespace run is a separator, not plain space).
fn scan_token(rest: &str) -> (TokenKind, usize) {
    let mut best: Option<(TokenKind, usize)> = None;

    let candidates = [
        scan_comment(rest),
        scan_number(rest),
        scan_punct(rest),
        scan_word(rest),
        scan_string(rest),
        scan_prime(rest),
        scan_semi(rest),
        scan_space(rest),
    ];

    for candidate in candidates {
        if let Some((kind, len)) = candidate {
            match &best {
                Some((_, best_len)) if *best_len >= len => {}
                _ => best = Some((kind, len)),
            }
        }
    }

    best.unwrap_or_else(|| {
        // No rule accepted this code unit.
        let c = rest
            .chars()
            .next()
            .expect("scan_token requires non-empty input");
        (TokenKind::Invalid(c), c.len_utf8())
    })
}

/// `//` up to (not including) the newline.
fn scan_comment(rest: &str) -> Option<(TokenKind, usize)> {
    if !rest.starts_with("//") {
        return None;
    }
    let len = rest.find('\n').unwrap_or(rest.len());
    Some((TokenKind::Comment(EcoString::from(&rest[..len])), len))
}

/// `\d+(\.\d+)?` or `\.\d+`, optionally followed by `[eE][+-]?\d+`.
fn scan_number(rest: &str) -> Option<(TokenKind, usize)> {
    let bytes = rest.as_bytes();

    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    if end > 0 {
        // Optional fraction: a dot must be followed by at least one digit,
        // otherwise it belongs to the next token (`1...5` is a range).
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac = end + 1;
            while frac < bytes.len() && bytes[frac].is_ascii_digit() {
                frac += 1;
            }
            if frac > end + 1 {
                end = frac;
            }
        }
    } else {
        // `.5` form.
        if bytes.first() != Some(&b'.') {
            return None;
        }
        let mut frac = 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac == 1 {
            return None;
        }
        end = frac;
    }

    // Optional exponent, only if it has at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let digits_at = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > digits_at {
            end = exp;
        }
    }

    Some((TokenKind::Number(EcoString::from(&rest[..end])), end))
}

/// One of the fixed punctuation strings.
fn scan_punct(rest: &str) -> Option<(TokenKind, usize)> {
    PUNCT_TABLE
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|&(spelling, punct)| (TokenKind::Punct(punct), spelling.len()))
}

/// `[A-Za-z][A-Za-z0-9_]*`, promoted to a keyword when reserved.
fn scan_word(rest: &str) -> Option<(TokenKind, usize)> {
    let bytes = rest.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut end = 1;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    let text = &rest[..end];
    let kind = match super::Keyword::from_lexeme(text) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Identifier(EcoString::from(text)),
    };
    Some((kind, end))
}

/// `"…"` with `\` as an escape character, non-greedy, single line.
///
/// An unterminated string matches nothing, so the opening quote falls
/// through to [`TokenKind::Invalid`] and lexing continues after it.
fn scan_string(rest: &str) -> Option<(TokenKind, usize)> {
    let mut chars = rest.char_indices();
    if chars.next().map(|(_, c)| c) != Some('"') {
        return None;
    }
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            if c == '\n' {
                return None;
            }
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                let len = idx + 1;
                return Some((TokenKind::String(EcoString::from(&rest[..len])), len));
            }
            '\n' => return None,
            _ => {}
        }
    }
    None
}

/// One or more `'` characters.
fn scan_prime(rest: &str) -> Option<(TokenKind, usize)> {
    let len = rest.bytes().take_while(|&b| b == b'\'').count();
    if len == 0 {
        return None;
    }
    Some((TokenKind::Prime(EcoString::from(&rest[..len])), len))
}

/// A literal `;`, or a whitespace run with two or more newlines.
fn scan_semi(rest: &str) -> Option<(TokenKind, usize)> {
    if rest.starts_with(';') {
        return Some((TokenKind::Semi, 1));
    }
    let len = whitespace_run(rest);
    if len > 0 && rest[..len].matches('\n').count() >= 2 {
        return Some((TokenKind::Semi, len));
    }
    None
}

/// Any other whitespace run.
fn scan_space(rest: &str) -> Option<(TokenKind, usize)> {
    let len = whitespace_run(rest);
    if len == 0 {
        return None;
    }
    Some((TokenKind::Space(EcoString::from(&rest[..len])), len))
}

fn whitespace_run(rest: &str) -> usize {
    rest.bytes()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count()
}
