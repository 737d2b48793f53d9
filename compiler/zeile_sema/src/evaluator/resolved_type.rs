//! What an expression resolves to, and resolution of written types.

use zeile_diagnostic::{messages, Diagnostic, DiagnosticId};
use zeile_ir::{TypeKind, TypeSyntax};

use super::SemaEvaluator;

/// Result of resolving an expression.
///
/// Only `Plain` is a value; the other two are what names and member
/// accesses resolve to before a call or member access consumes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ResolvedType {
    /// A value of the named type.
    Plain(String),
    /// The type itself, e.g. `Character` in `Character(id: 1)`.
    Metatype(String),
    /// A reference to every overload named `name` of an owner.
    FunctionRef {
        /// Owning struct, `None` for top-level functions.
        owner: Option<String>,
        name: String,
        /// Reached through the type rather than an instance.
        is_static: bool,
    },
}

/// Suffix of a metatype name once it is stored as a value type.
pub(crate) const METATYPE_SUFFIX: &str = ".Type";

impl ResolvedType {
    /// Reading a variable of type `type_name`.
    pub(crate) fn of_variable(type_name: &str) -> Self {
        match type_name.strip_suffix(METATYPE_SUFFIX) {
            Some(base) => ResolvedType::Metatype(base.to_owned()),
            None => ResolvedType::Plain(type_name.to_owned()),
        }
    }
}

impl SemaEvaluator<'_> {
    /// Whether `name` can appear in a written type.
    pub(super) fn type_exists(&self, name: &str) -> bool {
        self.declared_types.contains(name)
    }

    /// Resolve a written type to a type name.
    ///
    /// Optional types are recognized so the right diagnostic can be given,
    /// but no position accepts them.
    pub(super) fn resolve_type_syntax(&mut self, ty: &TypeSyntax) -> Option<String> {
        match &ty.kind {
            TypeKind::Identifier { name, generic_args } => {
                if let Some(span) = generic_args {
                    self.report(
                        Diagnostic::new(DiagnosticId::GenericNotSupported)
                            .with_label(*span, "generic arguments here"),
                    );
                    return None;
                }
                if self.type_exists(name) {
                    Some(name.clone())
                } else {
                    self.report(messages::cannot_find_type(ty.span, name));
                    None
                }
            }
            TypeKind::Optional(wrapped) => {
                if matches!(wrapped.kind, TypeKind::Optional(_)) {
                    self.report(
                        Diagnostic::new(DiagnosticId::NestingOptionalTypeNotSupported)
                            .with_label(ty.span, ""),
                    );
                    return None;
                }
                self.resolve_type_syntax(wrapped)?;
                self.report(
                    Diagnostic::new(DiagnosticId::ContextOptionalTypeNotSupported)
                        .with_label(ty.span, ""),
                );
                None
            }
            TypeKind::Other => {
                self.report(
                    Diagnostic::new(DiagnosticId::UnsupportedTypeSyntax).with_label(ty.span, ""),
                );
                None
            }
        }
    }
}
