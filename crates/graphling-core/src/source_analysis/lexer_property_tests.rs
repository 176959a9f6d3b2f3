// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Graphling lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces tokens
//! 2. **Tokens tile the input** — spans are contiguous, in order, and cover
//!    every byte exactly once
//! 3. **Lexer is deterministic** — same input always produces same tokens
//! 4. **Valid fragments produce no invalid tokens** — known-good inputs lex
//!    cleanly

use proptest::prelude::*;

use super::lexer::{lex, lex_with_eof};
use super::token::TokenKind;

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    ".5",
    "1e-3",
    "\"hello\"",
    "x",
    "a_1",
    "total",
    "table",
    "with",
    "+",
    "-",
    "->",
    "<=",
    "...",
    "d/d",
    "@{",
    "#{",
    "(",
    ")",
    "[",
    "]",
    "'",
    "''",
    ";",
];

/// Multi-token valid fragments that should lex cleanly.
const VALID_EXPRESSIONS: &[&str] = &[
    "y=x",
    "f(x)=x^2+1",
    "[a+b for a=[0,5,10], b=[1...5]]",
    "{x>3:5, x<=0:-1, x}",
    "y1 ~ m*x1+b #{ m=1.5, b=2.3 }",
    "(d/d x) x^2",
    "sum i=(1...10) i^2",
    "ticker a -> a+1",
    "settings @{ randomSeed: 5 }",
    "// a comment",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(VALID_SINGLE_TOKENS),
        prop::sample::select(VALID_EXPRESSIONS),
    ]
    .prop_map(std::string::ToString::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Property 1: the lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = lex(&input);
    }

    /// Property 2: token spans tile the input — contiguous, in order, and
    /// covering every byte.
    #[test]
    fn token_spans_tile_the_input(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        let mut offset: u32 = 0;
        for token in &tokens {
            prop_assert_eq!(
                token.span().start(),
                offset,
                "token {:?} does not start where the previous ended",
                token.kind()
            );
            prop_assert!(token.span().end() >= token.span().start());
            offset = token.span().end();
        }
        prop_assert_eq!(offset as usize, input.len());
    }

    /// Property 2b: `lex_with_eof` ends with exactly one EOF token at the
    /// end of input.
    #[test]
    fn eof_is_always_last(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
        let last = tokens.last().expect("at least the EOF token");
        prop_assert!(last.kind().is_eof());
        prop_assert_eq!(last.span().end() as usize, input.len());
    }

    /// Property 3: lexing is deterministic.
    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,500}") {
        let first = lex(&input);
        let second = lex(&input);
        prop_assert_eq!(first, second);
    }

    /// Property 4: known-valid fragments contain no invalid tokens.
    #[test]
    fn valid_fragments_lex_cleanly(input in valid_fragment()) {
        let tokens = lex(&input);
        for token in &tokens {
            prop_assert!(
                !matches!(token.kind(), TokenKind::Invalid(_)),
                "unexpected invalid token in {input:?}"
            );
        }
    }

    /// Joining fragments with separators still lexes cleanly.
    #[test]
    fn fragment_sequences_lex_cleanly(fragments in prop::collection::vec(valid_fragment(), 1..6)) {
        let input = fragments.join("; ");
        let tokens = lex(&input);
        for token in &tokens {
            prop_assert!(
                !matches!(token.kind(), TokenKind::Invalid(_)),
                "unexpected invalid token in {input:?}"
            );
        }
    }
}
