// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Renderable syntax errors.
//!
//! The parser collects plain [`Diagnostic`](super::Diagnostic) records; this
//! module wraps one into a [`SyntaxError`] that integrates with [`miette`]
//! for labelled terminal reports. The core stays I/O-free: callers attach
//! the source text themselves via `miette`'s report machinery.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use super::parser::{Diagnostic, Severity};

/// A parser diagnostic in renderable form.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic()]
pub struct SyntaxError {
    /// The diagnostic message.
    pub message: EcoString,
    /// Whether the diagnostic was an error or a warning.
    pub is_warning: bool,
    /// The source location of the problem.
    #[label("here")]
    pub span: Option<miette::SourceSpan>,
}

impl From<&Diagnostic> for SyntaxError {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            message: diagnostic.message.clone(),
            is_warning: diagnostic.severity == Severity::Warning,
            span: diagnostic.span.map(Into::into),
        }
    }
}
