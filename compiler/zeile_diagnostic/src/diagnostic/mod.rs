//! Core diagnostic types.
//!
//! Defines [`Diagnostic`], [`Label`] and [`Severity`], the values every phase
//! uses to report problems.

pub mod messages;

use std::fmt;

use zeile_ir::{Span, UnitId};

use crate::span_utils::offset_to_line_col;
use crate::DiagnosticId;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Remark,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Remark => write!(f, "remark"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    /// The source location to highlight.
    pub span: Span,
    /// The label text explaining this location.
    pub message: String,
    /// Whether this is the primary error location.
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A reported problem.
///
/// Line and column are not stored; they are computed on demand from the
/// primary span and the unit's source text (see [`Diagnostic::line_col`]).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Catalog id for searchability.
    pub id: DiagnosticId,
    /// Severity level.
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// Unit the spans point into, if known.
    pub unit: Option<UnitId>,
    /// Labeled spans showing where the problem is.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the id's default severity and template text.
    #[cold]
    pub fn new(id: DiagnosticId) -> Self {
        Diagnostic {
            id,
            severity: id.default_severity(),
            message: id.template().to_owned(),
            unit: None,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a diagnostic forced to error severity.
    #[cold]
    pub fn error(id: DiagnosticId) -> Self {
        Self::new(id).with_severity(Severity::Error)
    }

    /// Create a diagnostic forced to warning severity.
    #[cold]
    pub fn warning(id: DiagnosticId) -> Self {
        Self::new(id).with_severity(Severity::Warning)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the problem location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach the unit the spans refer to.
    pub fn in_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Check if this is an error (vs warning/note/remark).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// 1-based (line, column) of the primary span in `source`.
    pub fn line_col(&self, source: &str) -> Option<(u32, u32)> {
        self.primary_span()
            .map(|span| offset_to_line_col(source, span.start))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.id, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// The "has error" predicate over a batch of diagnostics.
pub trait HasError {
    /// True iff any diagnostic has error severity.
    fn has_error(&self) -> bool;

    fn error_count(&self) -> usize;
}

impl HasError for [Diagnostic] {
    fn has_error(&self) -> bool {
        self.iter().any(Diagnostic::is_error)
    }

    fn error_count(&self) -> usize {
        self.iter().filter(|d| d.is_error()).count()
    }
}

impl HasError for Vec<Diagnostic> {
    fn has_error(&self) -> bool {
        self.as_slice().has_error()
    }

    fn error_count(&self) -> usize {
        self.as_slice().error_count()
    }
}
