// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Identifier normalization and the non-subscripting name set.
//!
//! Graphling identifiers follow an implicit-subscript rule: a bare
//! multi-letter name like `xyz` means `x` subscripted by `yz` and is
//! normalized to `x_yz`. Names of built-in operators and commands must be
//! exempt (`total` is a function, not `t` subscript `otal`), so the parser
//! is handed a [`NameTable`] of names that never subscript. The table is
//! supplied by the host application (it owns the built-in catalogue) and is
//! read-only, so one table can be shared across parses.

use std::collections::HashSet;

use ecow::EcoString;

/// Built-ins whose spelling is too fragile to survive subscript rewriting.
const FRAGILE_NAMES: &[&str] = &[
    "polyGamma",
    "argmin",
    "argmax",
    "uniquePerm",
    "rtxsqpone",
    "rtxsqmone",
    "hypot",
];

/// Reserved identifiers that always denote themselves.
const RESERVED_NAMES: &[&str] = &["index", "dt", "else", "true", "false"];

/// The set of identifier names exempt from implicit subscripting.
///
/// Built once per host from the auto-operator and auto-command catalogues;
/// the fixed fragile and reserved names are always included.
#[derive(Debug, Clone)]
pub struct NameTable {
    non_subscript: HashSet<String>,
}

impl NameTable {
    /// Builds a table from the host's operator and command name lists.
    #[must_use]
    pub fn new(
        auto_operators: impl IntoIterator<Item = impl Into<String>>,
        auto_commands: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut non_subscript: HashSet<String> = auto_operators
            .into_iter()
            .map(Into::into)
            .chain(auto_commands.into_iter().map(Into::into))
            .collect();
        non_subscript.extend(
            FRAGILE_NAMES
                .iter()
                .chain(RESERVED_NAMES)
                .map(ToString::to_string),
        );
        Self { non_subscript }
    }

    /// Returns `true` if `name` is exempt from implicit subscripting.
    #[must_use]
    pub fn is_non_subscript(&self, name: &str) -> bool {
        self.non_subscript.contains(name)
    }
}

impl Default for NameTable {
    /// A table with only the fixed fragile and reserved names.
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), std::iter::empty::<&str>())
    }
}

/// The result of normalizing a raw identifier lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Normalization {
    /// The normalized name.
    Name(EcoString),
    /// More than one `_`; the parser substitutes the name `error`.
    TooManyUnderscores,
    /// The lexeme ends in `_`.
    TrailingUnderscore,
    /// The part before `_` contains a digit.
    DigitBeforeUnderscore,
}

/// Applies the implicit-subscript rule to a raw identifier lexeme.
///
/// The lexeme is guaranteed by the lexer to match `[A-Za-z][A-Za-z0-9_]*`.
pub(crate) fn normalize_identifier(raw: &str, names: &NameTable) -> Normalization {
    let mut parts = raw.splitn(3, '_');
    let main = parts.next().unwrap_or_default();
    let sub = parts.next();
    if parts.next().is_some() {
        return Normalization::TooManyUnderscores;
    }

    // Single letters and catalogued names pass through untouched.
    if (sub.is_none() && main.len() == 1) || names.is_non_subscript(raw) {
        return Normalization::Name(raw.into());
    }

    match sub {
        None => {
            // Implicit subscript: `xyz` -> `x_yz`.
            let (first, tail) = main.split_at(1);
            Normalization::Name(ecow::eco_format!("{first}_{tail}"))
        }
        Some("") => Normalization::TrailingUnderscore,
        Some(_) if main.bytes().any(|b| b.is_ascii_digit()) => {
            Normalization::DigitBeforeUnderscore
        }
        Some(_) => Normalization::Name(raw.into()),
    }
}
