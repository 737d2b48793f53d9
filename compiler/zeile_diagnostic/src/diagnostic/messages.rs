//! Message rendering and helpers for the most common diagnostics.

use zeile_ir::Span;

use super::Diagnostic;
use crate::DiagnosticId;

/// Fill the `%s` placeholders of `id`'s template in order.
///
/// Missing arguments render as empty strings; extra arguments are ignored.
pub fn render(id: DiagnosticId, args: &[&str]) -> String {
    let template = id.template();
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut args = args.iter();
    let mut pieces = template.split("%s");
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        out.push_str(args.next().copied().unwrap_or_default());
        out.push_str(piece);
    }
    out
}

impl Diagnostic {
    /// Set the message from the catalog template and `args`.
    pub fn with_args(self, args: &[&str]) -> Self {
        let message = render(self.id, args);
        self.with_message(message)
    }
}

/// Invalid redeclaration of `name`.
pub fn invalid_redeclaration(span: Span, name: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::InvalidRedeclaration)
        .with_args(&[name])
        .with_label(span, "redeclared here")
}

/// Cannot find type `name` in scope.
pub fn cannot_find_type(span: Span, name: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::CannotFindTypeInScope)
        .with_args(&[name])
        .with_label(span, "not found in this scope")
}

/// Cannot find value `name` in scope.
pub fn cannot_find_in_scope(span: Span, name: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::CannotFindInScope)
        .with_args(&[name])
        .with_label(span, "not found in this scope")
}

/// Annotation and initializer types disagree.
pub fn initializer_type_mismatch(span: Span, found: &str, expected: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::SpecifiedTypeNotMatchToInitializer)
        .with_args(&[found, expected])
        .with_label(span, format!("expected `{expected}`, found `{found}`"))
}

/// A variable's initializer refers back to the variable.
pub fn circular_reference(span: Span, name: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::CircularReference)
        .with_args(&[name])
        .with_label(span, format!("`{name}` is still being checked here"))
}

/// An argument's type differs from the parameter type.
pub fn argument_type_mismatch(span: Span, found: &str, expected: &str) -> Diagnostic {
    Diagnostic::new(DiagnosticId::CallArgumentTypeMismatch)
        .with_args(&[found, expected])
        .with_label(span, format!("expected `{expected}`"))
}
