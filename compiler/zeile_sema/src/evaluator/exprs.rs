//! Expression type resolution.

use zeile_diagnostic::{messages, Diagnostic, DiagnosticId};
use zeile_ir::{
    fold_sequence, BinaryOp, ExprId, ExprKind, FoldError, Folded, Ident, Span, StrSegment,
};

use super::resolved_type::METATYPE_SUFFIX;
use super::{ResolvedType, SemaEvaluator};

impl<'a> SemaEvaluator<'a> {
    /// Resolve an expression used as a value.
    ///
    /// Metatypes become `T.Type`; a bare function reference is rejected.
    pub(super) fn resolve_value_type(&mut self, id: ExprId, expected: Option<&str>) -> Option<String> {
        match self.resolve_type(id, expected)? {
            ResolvedType::Plain(name) => Some(name),
            ResolvedType::Metatype(name) => Some(format!("{name}{METATYPE_SUFFIX}")),
            ResolvedType::FunctionRef { name, .. } => {
                let span = self.unit().expr(id).span;
                self.report(
                    Diagnostic::new(DiagnosticId::FunctionUsedAsValue)
                        .with_args(&[&name])
                        .with_label(span, "add an argument list to call it"),
                );
                None
            }
        }
    }

    /// Resolve what an expression denotes.
    ///
    /// `expected` is the contextual type, used only by implicit members.
    pub(super) fn resolve_type(&mut self, id: ExprId, expected: Option<&str>) -> Option<ResolvedType> {
        let expr = self.unit().expr(id);
        match &expr.kind {
            ExprKind::Int(_) => self.stdlib_type("Int", expr.span),
            ExprKind::Float(_) => self.stdlib_type("Float", expr.span),
            ExprKind::Bool(_) => self.stdlib_type("Bool", expr.span),
            ExprKind::Str(segments) => {
                for segment in segments {
                    if let StrSegment::Interpolation(inner) = segment {
                        self.resolve_value_type(*inner, None);
                    }
                }
                self.stdlib_type("String", expr.span)
            }
            ExprKind::Ref(ident) => self.resolve_ref(ident),
            ExprKind::Member {
                base: Some(base),
                member,
            } => self.resolve_member(*base, member),
            ExprKind::Member { base: None, member } => {
                self.resolve_implicit_member(member, expected)
            }
            ExprKind::Call { callee, args } => self.resolve_call(id, *callee, args, false),
            ExprKind::Sequence { .. } | ExprKind::Infix { .. } => self.resolve_operators(id),
            ExprKind::Closure(block) => {
                self.with_local_scope(|this| this.check_local_block(block));
                self.stdlib_type("Closure", expr.span)
            }
            ExprKind::Await(inner) => {
                let inner_expr = self.unit().expr(*inner);
                match &inner_expr.kind {
                    ExprKind::Call { callee, args } => {
                        self.resolve_call(*inner, *callee, args, true)
                    }
                    _ => self.resolve_type(*inner, expected),
                }
            }
            ExprKind::Unsupported(kind) => {
                self.report(
                    Diagnostic::new(DiagnosticId::UnsupportedExpression)
                        .with_args(&[kind])
                        .with_label(expr.span, ""),
                );
                None
            }
        }
    }

    /// A literal's type, which the standard library must have declared.
    fn stdlib_type(&mut self, name: &str, span: Span) -> Option<ResolvedType> {
        if self.tables.structs.contains_key(name) {
            Some(ResolvedType::Plain(name.to_owned()))
        } else {
            self.report(
                Diagnostic::new(DiagnosticId::MissingStdlibType)
                    .with_args(&[name])
                    .with_label(span, ""),
            );
            None
        }
    }

    fn resolve_ref(&mut self, ident: &Ident) -> Option<ResolvedType> {
        let name = ident.text.as_str();
        if let Some(type_name) = self.lookup_local(name) {
            return Some(ResolvedType::of_variable(type_name));
        }
        if self.checking.contains(name) {
            self.report(messages::circular_reference(ident.span, name));
            return None;
        }
        if let Some(entry) = self.tables.top_vars.get(name) {
            return Some(ResolvedType::of_variable(&entry.type_name));
        }
        if self.tables.top_functions_named(name).next().is_some() {
            return Some(ResolvedType::FunctionRef {
                owner: None,
                name: name.to_owned(),
                is_static: false,
            });
        }
        if self.tables.is_type(name) || self.declared_types.contains(name) {
            return Some(ResolvedType::Metatype(name.to_owned()));
        }
        self.report(messages::cannot_find_in_scope(ident.span, name));
        None
    }

    fn resolve_member(&mut self, base: ExprId, member: &Ident) -> Option<ResolvedType> {
        let name = member.text.as_str();
        match self.resolve_type(base, None)? {
            ResolvedType::Metatype(owner) => {
                let key = format!("{owner}.{name}");
                if self.checking.contains(&key) {
                    self.report(messages::circular_reference(member.span, &key));
                    return None;
                }
                let found = self.static_member(&owner, name);
                if found.is_none() {
                    self.report(
                        Diagnostic::new(DiagnosticId::TypeHasNoMember)
                            .with_args(&[owner.as_str(), name])
                            .with_label(member.span, ""),
                    );
                }
                found
            }
            ResolvedType::Plain(owner) => {
                let found = self.instance_member(&owner, name);
                if found.is_none() {
                    self.report(
                        Diagnostic::new(DiagnosticId::ValueHasNoMember)
                            .with_args(&[owner.as_str(), name])
                            .with_label(member.span, ""),
                    );
                }
                found
            }
            ResolvedType::FunctionRef { name: function, .. } => {
                self.report(
                    Diagnostic::new(DiagnosticId::MemberOnFunctionReference)
                        .with_args(&[function.as_str(), name])
                        .with_label(member.span, ""),
                );
                None
            }
        }
    }

    /// `Owner.name`: an enum case, static variable or static method.
    fn static_member(&self, owner: &str, name: &str) -> Option<ResolvedType> {
        if let Some(resolved) = self.tables.enums.get(owner) {
            return resolved
                .has_case(name)
                .then(|| ResolvedType::Plain(owner.to_owned()));
        }
        let resolved = self.tables.structs.get(owner)?;
        if let Some(var) = resolved.static_vars.get(name) {
            return Some(ResolvedType::of_variable(&var.type_name));
        }
        resolved
            .methods_named(name, true)
            .next()
            .map(|_| ResolvedType::FunctionRef {
                owner: Some(owner.to_owned()),
                name: name.to_owned(),
                is_static: true,
            })
    }

    /// `value.name`: an instance variable or instance method.
    fn instance_member(&self, owner: &str, name: &str) -> Option<ResolvedType> {
        let resolved = self.tables.structs.get(owner)?;
        if let Some(var) = resolved.instance_vars.get(name) {
            return Some(ResolvedType::of_variable(&var.type_name));
        }
        resolved
            .methods_named(name, false)
            .next()
            .map(|_| ResolvedType::FunctionRef {
                owner: Some(owner.to_owned()),
                name: name.to_owned(),
                is_static: false,
            })
    }

    fn resolve_implicit_member(&mut self, member: &Ident, expected: Option<&str>) -> Option<ResolvedType> {
        let Some(expected) = expected else {
            self.report(
                Diagnostic::new(DiagnosticId::CannotInferImplicitMemberBase)
                    .with_args(&[&member.text])
                    .with_label(member.span, ""),
            );
            return None;
        };
        if self.implicit_member_matches(expected, &member.text) {
            Some(ResolvedType::Plain(expected.to_owned()))
        } else {
            self.report(
                Diagnostic::new(DiagnosticId::TypeHasNoMember)
                    .with_args(&[expected, member.text.as_str()])
                    .with_label(member.span, ""),
            );
            None
        }
    }

    /// Whether `.member` names a value of type `type_name`: one of its enum
    /// cases, or one of its static variables of its own type.
    pub(super) fn implicit_member_matches(&self, type_name: &str, member: &str) -> bool {
        if let Some(resolved) = self.tables.enums.get(type_name) {
            return resolved.has_case(member);
        }
        self.tables
            .structs
            .get(type_name)
            .and_then(|s| s.static_vars.get(member))
            .is_some_and(|var| var.type_name == type_name)
    }

    // -- Operators --

    fn resolve_operators(&mut self, id: ExprId) -> Option<ResolvedType> {
        match fold_sequence(self.unit(), id) {
            Ok(folded) => self.resolve_folded(&folded).map(ResolvedType::Plain),
            Err(FoldError::UnknownOperator { symbol, span }) => {
                self.report(
                    Diagnostic::new(DiagnosticId::UnknownOperator)
                        .with_args(&[&symbol])
                        .with_label(span, ""),
                );
                None
            }
            Err(FoldError::Malformed { span }) => {
                self.report(
                    Diagnostic::new(DiagnosticId::SequenceFoldFailed).with_label(span, ""),
                );
                None
            }
        }
    }

    fn resolve_folded(&mut self, folded: &Folded) -> Option<String> {
        match folded {
            Folded::Leaf(id) => self.resolve_value_type(*id, None),
            Folded::Binary {
                op,
                op_span,
                lhs,
                rhs,
                ..
            } => {
                let lhs = self.resolve_folded(lhs);
                let rhs = self.resolve_folded(rhs);
                let (lhs, rhs) = (lhs?, rhs?);
                let result = binary_result_type(*op, &lhs, &rhs);
                if result.is_none() {
                    self.report(
                        Diagnostic::new(DiagnosticId::BinaryOperatorTypeMismatch)
                            .with_args(&[op.as_symbol(), lhs.as_str(), rhs.as_str()])
                            .with_label(*op_span, ""),
                    );
                }
                result
            }
        }
    }
}

/// Result type of `lhs op rhs`, or `None` if the operator does not apply.
fn binary_result_type(op: BinaryOp, lhs: &str, rhs: &str) -> Option<String> {
    if lhs != rhs {
        return None;
    }
    let accepted = if op.is_arithmetic() {
        matches!(lhs, "Int" | "Float") || (op == BinaryOp::Add && lhs == "String")
    } else if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) {
        !lhs.ends_with(METATYPE_SUFFIX) && lhs != "Closure"
    } else if op.is_comparison() {
        matches!(lhs, "Int" | "Float" | "String")
    } else {
        lhs == "Bool"
    };
    if !accepted {
        return None;
    }
    if op.is_arithmetic() {
        Some(lhs.to_owned())
    } else {
        Some("Bool".to_owned())
    }
}
