//! Declaration checks.
//!
//! Every check reports what it finds and keeps going, so one pass yields as
//! many diagnostics as possible.

use zeile_diagnostic::{messages, Diagnostic, DiagnosticId};
use zeile_ir::{
    Decl, DeclId, DeclKind, EnumDecl, FunctionDecl, FunctionSig, Param, Pattern, Span,
    StructDecl, VariableDecl,
};

use super::SemaEvaluator;
use crate::{ExprRef, ResolvedEnum, ResolvedStruct, SemaTables, VariableEntry};

/// Where a `static` modifier is acceptable.
#[derive(Copy, Clone, PartialEq, Eq)]
enum StaticPolicy {
    /// Struct methods and stored variables.
    Allowed,
    /// Top-level and closure-local declarations.
    OutsideStruct,
    /// Declarations that take no modifiers at all.
    Rejected,
}

/// Where a variable declaration sits.
#[derive(Copy, Clone)]
enum VarScope<'s> {
    TopLevel,
    Member { owner: &'s str },
    Local,
}

/// A checked binding ready to be registered.
struct CheckedBinding {
    name: String,
    span: Span,
    entry: VariableEntry,
}

impl<'a> SemaEvaluator<'a> {
    pub(super) fn check_top_level_decl(&mut self, id: DeclId) {
        let decl = self.unit().decl(id);
        match &decl.kind {
            DeclKind::Enum(e) => self.check_enum_decl(decl, e),
            DeclKind::Struct(s) => self.check_struct_decl(decl, s),
            DeclKind::Function(f) => self.check_top_level_function(decl, f),
            DeclKind::Variable(v) => self.check_top_level_variable(decl, v),
            DeclKind::EnumCase(_) | DeclKind::Other(_) => self.report_unsupported_decl(decl),
        }
    }

    pub(super) fn check_local_decl(&mut self, id: DeclId) {
        let decl = self.unit().decl(id);
        match &decl.kind {
            DeclKind::Variable(v) => self.check_local_variable(decl, v),
            DeclKind::Struct(_) | DeclKind::Enum(_) => self.report_nested(decl),
            DeclKind::Function(_) => self.report(
                Diagnostic::new(DiagnosticId::UnexpectedTopLevelTypeCheckPath)
                    .with_label(decl.span, "functions must be declared at file scope"),
            ),
            DeclKind::EnumCase(_) | DeclKind::Other(_) => self.report_unsupported_decl(decl),
        }
    }

    fn report_unsupported_decl(&mut self, decl: &Decl) {
        self.report(
            Diagnostic::new(DiagnosticId::UnsupportedDeclaration)
                .with_args(&[decl.kind.keyword()])
                .with_label(decl.span, ""),
        );
    }

    fn report_nested(&mut self, decl: &Decl) {
        self.report(
            Diagnostic::new(DiagnosticId::NestedDeclarationNotSupported)
                .with_args(&[decl.kind.keyword()])
                .with_label(decl.span, "nested declaration"),
        );
    }

    fn reject_attributes(&mut self, decl: &Decl) {
        if !decl.attributes.is_empty() {
            self.report(
                Diagnostic::new(DiagnosticId::AttributesNotSupported)
                    .with_label(decl.attributes_span(), ""),
            );
        }
    }

    fn reject_clauses(
        &mut self,
        generic: Option<Span>,
        inheritance: Option<Span>,
        where_clause: Option<Span>,
    ) {
        if let Some(span) = generic {
            self.report(Diagnostic::new(DiagnosticId::GenericNotSupported).with_label(span, ""));
        }
        if let Some(span) = inheritance {
            self.report(
                Diagnostic::new(DiagnosticId::InheritanceNotSupported).with_label(span, ""),
            );
        }
        if let Some(span) = where_clause {
            self.report(
                Diagnostic::new(DiagnosticId::WhereClauseNotSupported).with_label(span, ""),
            );
        }
    }

    /// Check a declaration's modifiers; returns whether it is static.
    fn check_modifiers(&mut self, decl: &Decl, policy: StaticPolicy) -> bool {
        let mut statics = 0;
        for modifier in &decl.modifiers {
            if !modifier.is_static() || policy == StaticPolicy::Rejected {
                self.report(
                    Diagnostic::new(DiagnosticId::DeclModifierNotSupported)
                        .with_args(&[&modifier.name])
                        .with_label(modifier.span, ""),
                );
                continue;
            }
            statics += 1;
            if statics > 1 {
                self.report(
                    Diagnostic::new(DiagnosticId::DuplicateStaticModifier)
                        .with_label(modifier.span, "already marked 'static'"),
                );
            } else if policy == StaticPolicy::OutsideStruct {
                self.report(
                    Diagnostic::new(DiagnosticId::StaticOutsideStruct)
                        .with_label(modifier.span, ""),
                );
            }
        }
        statics > 0 && policy == StaticPolicy::Allowed
    }

    // -- Enums --

    fn check_enum_decl(&mut self, decl: &'a Decl, e: &'a EnumDecl) {
        self.reject_attributes(decl);
        self.check_modifiers(decl, StaticPolicy::Rejected);
        self.reject_clauses(e.generic_clause, e.inheritance_clause, e.where_clause);

        let name = &e.name.text;
        if e.members.is_empty() {
            self.report(
                Diagnostic::new(DiagnosticId::MissingMemberBlock)
                    .with_args(&[name])
                    .with_label(e.name.span, ""),
            );
        }

        let mut cases: Vec<String> = Vec::new();
        for &member in &e.members {
            let member_decl = self.unit().decl(member);
            let DeclKind::EnumCase(case) = &member_decl.kind else {
                if matches!(member_decl.kind, DeclKind::Struct(_) | DeclKind::Enum(_)) {
                    self.report_nested(member_decl);
                } else {
                    self.report(
                        Diagnostic::new(DiagnosticId::UnsupportedDeclInEnum)
                            .with_label(member_decl.span, ""),
                    );
                }
                continue;
            };

            self.reject_attributes(member_decl);
            self.check_modifiers(member_decl, StaticPolicy::Rejected);
            if case.elements.is_empty() {
                self.report(
                    Diagnostic::new(DiagnosticId::MissingIdentifierInEnumCase)
                        .with_label(member_decl.span, ""),
                );
            }
            for element in &case.elements {
                if let Some(span) = element.parameter_clause {
                    self.report(
                        Diagnostic::new(DiagnosticId::EnumCaseParameterNotSupported)
                            .with_label(span, ""),
                    );
                }
                if let Some(span) = element.raw_value {
                    self.report(
                        Diagnostic::new(DiagnosticId::EnumRawValueNotSupported)
                            .with_label(span, ""),
                    );
                }
                if cases.contains(&element.name.text) {
                    self.report(messages::invalid_redeclaration(
                        element.name.span,
                        &element.name.text,
                    ));
                } else {
                    cases.push(element.name.text.clone());
                }
            }
        }

        if self.tables.is_type(name) {
            self.report(messages::invalid_redeclaration(e.name.span, name));
        } else {
            self.tables
                .enums
                .insert(name.clone(), ResolvedEnum { cases });
        }
    }

    // -- Structs --

    fn check_struct_decl(&mut self, decl: &'a Decl, s: &'a StructDecl) {
        self.reject_attributes(decl);
        self.check_modifiers(decl, StaticPolicy::Rejected);
        self.reject_clauses(s.generic_clause, s.inheritance_clause, s.where_clause);

        let name = s.name.text.as_str();
        // Registered before the members so they can refer to the struct.
        let owns = !self.tables.is_type(name);
        if owns {
            self.tables
                .structs
                .insert(name.to_owned(), ResolvedStruct::default());
        } else {
            self.report(messages::invalid_redeclaration(s.name.span, name));
        }
        // Members of a redeclared struct are checked, then discarded.
        let mut scratch = ResolvedStruct::default();

        for &member in &s.members {
            let member_decl = self.unit().decl(member);
            match &member_decl.kind {
                DeclKind::Function(f) => {
                    let policy = if f.is_initializer {
                        StaticPolicy::Rejected
                    } else {
                        StaticPolicy::Allowed
                    };
                    let is_static = self.check_modifiers(member_decl, policy);
                    let sig = self.check_function_signature(member_decl, f);

                    let target = struct_target(&mut self.tables, &mut scratch, name, owns);
                    let list = if f.is_initializer {
                        &mut target.initializers
                    } else if is_static {
                        &mut target.static_methods
                    } else {
                        &mut target.instance_methods
                    };
                    if let Some(duplicate) = push_unique(list, sig) {
                        self.report(messages::invalid_redeclaration(
                            f.name.span,
                            &format!("{name}.{duplicate}"),
                        ));
                    }
                }
                DeclKind::Variable(v) => {
                    let is_static = self.check_modifiers(member_decl, StaticPolicy::Allowed);
                    let bindings =
                        self.check_variable_bindings(member_decl, v, VarScope::Member { owner: name });
                    for binding in bindings {
                        let target = struct_target(&mut self.tables, &mut scratch, name, owns);
                        let vars = if is_static {
                            &mut target.static_vars
                        } else {
                            &mut target.instance_vars
                        };
                        if vars.contains_key(&binding.name) {
                            self.report(messages::invalid_redeclaration(
                                binding.span,
                                &binding.name,
                            ));
                        } else {
                            vars.insert(binding.name, binding.entry);
                        }
                    }
                }
                DeclKind::Struct(_) | DeclKind::Enum(_) => self.report_nested(member_decl),
                DeclKind::EnumCase(_) | DeclKind::Other(_) => self.report(
                    Diagnostic::new(DiagnosticId::UnsupportedMemberInStruct)
                        .with_args(&[member_decl.kind.keyword()])
                        .with_label(member_decl.span, ""),
                ),
            }
        }
    }

    // -- Functions --

    fn check_top_level_function(&mut self, decl: &'a Decl, f: &'a FunctionDecl) {
        if f.is_initializer {
            self.report(
                Diagnostic::new(DiagnosticId::UnexpectedTopLevelTypeCheckPath)
                    .with_label(decl.span, "initializers belong to a struct"),
            );
            return;
        }
        self.check_modifiers(decl, StaticPolicy::OutsideStruct);
        let sig = self.check_function_signature(decl, f);
        if let Some(duplicate) = push_unique(&mut self.tables.top_functions, sig) {
            self.report(messages::invalid_redeclaration(
                f.name.span,
                &duplicate.to_string(),
            ));
        }
    }

    /// Checks shared by top-level functions, methods and initializers.
    ///
    /// Parameters whose type cannot be resolved are dropped from the
    /// signature.
    fn check_function_signature(&mut self, decl: &Decl, f: &FunctionDecl) -> FunctionSig {
        self.reject_attributes(decl);
        self.reject_clauses(f.generic_clause, None, f.where_clause);
        if let Some(body) = &f.body {
            self.report(
                Diagnostic::new(DiagnosticId::FunctionUnexpectedBody)
                    .with_label(body.span, "remove the body"),
            );
        }

        let mut sig = FunctionSig::new(f.name.text.clone());
        for param in &f.params {
            if !param.attributes.is_empty() {
                let span = param
                    .attributes
                    .iter()
                    .map(|a| a.span)
                    .reduce(Span::merge)
                    .unwrap_or(param.span);
                self.report(
                    Diagnostic::new(DiagnosticId::AttributesNotSupported).with_label(span, ""),
                );
            }
            for modifier in &param.modifiers {
                self.report(
                    Diagnostic::new(DiagnosticId::DeclModifierNotSupported)
                        .with_args(&[&modifier.name])
                        .with_label(modifier.span, ""),
                );
            }
            if let Some(span) = param.ellipsis {
                self.report(
                    Diagnostic::new(DiagnosticId::FunctionParamUnexpectedEllipsis)
                        .with_label(span, ""),
                );
            }
            if let Some(default) = param.default_value {
                let span = self.unit().expr(default).span;
                self.report(
                    Diagnostic::new(DiagnosticId::FunctionParamUnsupportedDefaultValueDecl)
                        .with_label(span, ""),
                );
            }
            if let Some(second) = &param.second_name {
                self.report(
                    Diagnostic::new(DiagnosticId::FunctionParamSecondNameIsUnused)
                        .with_args(&[&second.text])
                        .with_label(second.span, "remove this name"),
                );
            }
            if let Some(type_name) = self.resolve_type_syntax(&param.ty) {
                sig.params
                    .push(Param::new(param.first_name.text.clone(), type_name));
            }
        }

        sig.is_async = f.is_async();
        if let Some(span) = f.throws_span {
            self.report(
                Diagnostic::new(DiagnosticId::FunctionThrowsNotSupported).with_label(span, ""),
            );
        }
        if let Some(ret) = &f.return_type {
            if let Some(type_name) = self.resolve_type_syntax(ret) {
                sig.return_type = type_name;
            }
        }
        sig
    }

    // -- Variables --

    fn check_top_level_variable(&mut self, decl: &'a Decl, v: &'a VariableDecl) {
        self.check_modifiers(decl, StaticPolicy::OutsideStruct);
        for binding in self.check_variable_bindings(decl, v, VarScope::TopLevel) {
            if self.tables.top_vars.contains_key(&binding.name) {
                self.report(messages::invalid_redeclaration(binding.span, &binding.name));
            } else {
                self.tables.top_vars.insert(binding.name, binding.entry);
            }
        }
    }

    fn check_local_variable(&mut self, decl: &'a Decl, v: &'a VariableDecl) {
        self.check_modifiers(decl, StaticPolicy::OutsideStruct);
        for binding in self.check_variable_bindings(decl, v, VarScope::Local) {
            let Some(scope) = self.scopes.last_mut() else {
                continue;
            };
            if scope.contains_key(&binding.name) {
                self.report(messages::invalid_redeclaration(binding.span, &binding.name));
            } else {
                scope.insert(binding.name, binding.entry.type_name);
            }
        }
    }

    /// Check each binding; returns the ones that produced a type.
    fn check_variable_bindings(
        &mut self,
        decl: &Decl,
        v: &'a VariableDecl,
        scope: VarScope<'_>,
    ) -> Vec<CheckedBinding> {
        self.reject_attributes(decl);
        if v.specifier.text != "let" {
            self.report(
                Diagnostic::new(DiagnosticId::VariableSpecifierNotSupported)
                    .with_args(&[&v.specifier.text])
                    .with_label(v.specifier.span, ""),
            );
        }

        let mut checked = Vec::new();
        for binding in &v.bindings {
            let Pattern::Identifier(ident) = &binding.pattern else {
                self.report(
                    Diagnostic::new(DiagnosticId::UnsupportedBindingPattern)
                        .with_label(binding.span, ""),
                );
                continue;
            };

            let annotated = binding
                .annotation
                .as_ref()
                .map(|ty| self.resolve_type_syntax(ty));

            let key = match scope {
                VarScope::Member { owner } => Some(format!("{owner}.{}", ident.text)),
                VarScope::TopLevel => Some(ident.text.clone()),
                VarScope::Local => None,
            };
            let inferred = binding.initializer.map(|init| {
                if let Some(key) = &key {
                    self.checking.insert(key.clone());
                }
                let expected = annotated.as_ref().and_then(Option::as_deref);
                let found = self.resolve_value_type(init, expected);
                if let Some(key) = &key {
                    self.checking.remove(key);
                }
                (found, init)
            });

            let type_name = match (annotated, inferred) {
                (Some(Some(expected)), Some((Some(found), init))) if expected != found => {
                    let span = self.unit().expr(init).span;
                    self.report(messages::initializer_type_mismatch(span, &found, &expected));
                    continue;
                }
                (Some(Some(expected)), _) => expected,
                (None, Some((Some(found), _))) => found,
                (None, None) => {
                    self.report(
                        Diagnostic::new(DiagnosticId::CannotInferTypeWithoutInitializer)
                            .with_label(binding.span, "add a type annotation or an initializer"),
                    );
                    continue;
                }
                // Already diagnosed while resolving.
                (Some(None), _) | (None, Some((None, _))) => continue,
            };

            checked.push(CheckedBinding {
                name: ident.text.clone(),
                span: ident.span,
                entry: VariableEntry {
                    type_name,
                    initializer: binding
                        .initializer
                        .map(|init| ExprRef::new(self.current_unit, init)),
                },
            });
        }
        checked
    }
}

/// The table a struct's members go to: the registered entry, or a scratch
/// table for a redeclaration.
fn struct_target<'t>(
    tables: &'t mut SemaTables,
    scratch: &'t mut ResolvedStruct,
    name: &str,
    owns: bool,
) -> &'t mut ResolvedStruct {
    if owns {
        if let Some(target) = tables.structs.get_mut(name) {
            return target;
        }
    }
    scratch
}

/// Append `sig` unless a same-shaped signature exists; returns the
/// rejected signature.
fn push_unique(list: &mut Vec<FunctionSig>, sig: FunctionSig) -> Option<FunctionSig> {
    if list.iter().any(|existing| existing.same_shape(&sig)) {
        Some(sig)
    } else {
        list.push(sig);
        None
    }
}
