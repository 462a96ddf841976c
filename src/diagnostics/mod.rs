//! Diagnostics produced by the parser, checker and linter
//!
//! Every problem carries a stable code, a [`DiagnosticKind`] derived from that
//! code, and a span. Reports render either as one JSON object per line or as
//! annotated source text.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::parser::ast::NodeKind;

pub mod error_codes;
pub use error_codes::*;

/// Byte range plus 1-indexed line/column bounds inside one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub file: PathBuf,
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    pub fn new(
        file: PathBuf,
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            file,
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Empty span at the top of `path`, for problems with no better location
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), 0, 0, 1, 1, 1, 1)
    }

    fn underline(&self, line: &str) -> (usize, usize) {
        let offset = self.start_col.saturating_sub(1);
        let width = if self.end_line == self.start_line {
            self.end_col.saturating_sub(self.start_col)
        } else {
            line.len().saturating_sub(offset)
        };
        (offset, width.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// What went wrong, independent of the exact error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Syntax,
    Io,
    TypeMismatch,
    Retype,
    UnknownVariable,
    UnknownFunction,
    UnknownField,
    UnknownType,
    IllegalType,
    ArityShortfall,
    ArityExcess,
    MalformedSelector,
    Unsupported,
    Lint,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::Io => "i/o error",
            DiagnosticKind::TypeMismatch => "type mismatch",
            DiagnosticKind::Retype => "variable type changed",
            DiagnosticKind::UnknownVariable => "unknown variable",
            DiagnosticKind::UnknownFunction => "unknown function",
            DiagnosticKind::UnknownField => "unknown field",
            DiagnosticKind::UnknownType => "unknown type",
            DiagnosticKind::IllegalType => "illegal type",
            DiagnosticKind::ArityShortfall => "not enough arguments",
            DiagnosticKind::ArityExcess => "too many arguments",
            DiagnosticKind::MalformedSelector => "malformed selector",
            DiagnosticKind::Unsupported => "unsupported node",
            DiagnosticKind::Lint => "lint",
        };
        f.write_str(name)
    }
}

/// Extra context printed under a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub message: String,
}

impl Note {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code such as `E1001`
    pub code: String,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,

    /// Kind of the offending node, when one is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeKind>,

    /// Set on type mismatches only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Error)
    }

    pub fn warning(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Single-line JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Render with the offending line of `source` and a caret underline
    pub fn to_human_readable(&self, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}[{}]: {}", self.severity, self.code, self.message);
        let _ = writeln!(
            out,
            "  --> {}:{}:{}",
            self.span.file.display(),
            self.span.start_line,
            self.span.start_col
        );

        let line = self
            .span
            .start_line
            .checked_sub(1)
            .and_then(|index| source.lines().nth(index));
        if let Some(line) = line {
            let (offset, width) = self.span.underline(line);
            let _ = writeln!(out, "   |");
            let _ = writeln!(out, "{:>3} | {}", self.span.start_line, line);
            let _ = writeln!(out, "   | {}{}", " ".repeat(offset), "^".repeat(width));
        }

        if let Some(expected) = &self.expected {
            let _ = writeln!(out, "   = expected: {}", expected);
        }
        if let Some(actual) = &self.actual {
            let _ = writeln!(out, "   = actual: {}", actual);
        }
        for note in &self.notes {
            let _ = writeln!(out, "   = note: {}", note.message);
        }
        out
    }
}

/// Fluent construction of a [`Diagnostic`]; the kind follows from the code
pub struct DiagnosticBuilder(Diagnostic);

impl DiagnosticBuilder {
    fn new(code: String, severity: Severity) -> Self {
        Self(Diagnostic {
            kind: error_codes::kind_of(&code),
            code,
            severity,
            message: String::new(),
            span: Span::file(""),
            node: None,
            expected: None,
            actual: None,
            notes: Vec::new(),
        })
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.0.message = message.into();
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.0.span = span;
        self
    }

    pub fn node(mut self, node: NodeKind) -> Self {
        self.0.node = Some(node);
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.0.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.0.actual = Some(actual.into());
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.0.notes.push(note);
        self
    }

    pub fn build(self) -> Diagnostic {
        self.0
    }
}

/// Diagnostics in the order they were reported
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn take(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}
