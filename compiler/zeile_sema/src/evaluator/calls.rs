//! Overload resolution.
//!
//! Candidates are gathered by name and arity. Each candidate is checked on
//! its own and collects its own diagnostics; the candidate with the fewest
//! wins, the first one in declaration order on ties. Only the winner's
//! diagnostics are reported.

use tracing::trace;
use zeile_diagnostic::{messages, Diagnostic, DiagnosticId};
use zeile_ir::{CallArg, ExprId, ExprKind, FunctionSig, Span};

use super::{ResolvedType, SemaEvaluator};
use crate::{ExprRef, ResolvedCall};

/// What is known about one argument before candidates are compared.
#[derive(Clone, Debug)]
enum ArgType {
    /// Resolved without context.
    Known(String),
    /// `.member`, typed by the parameter it is passed to.
    Implicit(String),
    /// Failed to resolve; already diagnosed.
    Unknown,
}

/// The overload set a callee denotes.
struct CallTarget {
    name: String,
    parent: Option<String>,
    is_static: bool,
    candidates: Vec<FunctionSig>,
    /// Set when calling a type: the call constructs that type.
    constructs: Option<String>,
}

impl<'a> SemaEvaluator<'a> {
    pub(super) fn resolve_call(
        &mut self,
        call: ExprId,
        callee: ExprId,
        args: &'a [CallArg],
        awaited: bool,
    ) -> Option<ResolvedType> {
        let callee_span = self.unit().expr(callee).span;
        let target = self.call_target(callee, callee_span);
        let arg_types: Vec<ArgType> = args.iter().map(|arg| self.classify_arg(arg)).collect();
        let target = target?;

        let candidates: Vec<FunctionSig> = target
            .candidates
            .into_iter()
            .filter(|sig| sig.arity() == args.len())
            .collect();
        if candidates.is_empty() {
            self.report(
                Diagnostic::new(DiagnosticId::CallNoExactMatch)
                    .with_args(&[&target.name])
                    .with_label(callee_span, ""),
            );
            return None;
        }

        let scored: Vec<(FunctionSig, Vec<Diagnostic>)> = candidates
            .into_iter()
            .map(|sig| {
                let diagnostics = self.check_candidate(&sig, args, &arg_types, awaited);
                (sig, diagnostics)
            })
            .collect();
        trace!(
            callee = %target.name,
            candidates = scored.len(),
            "overload candidates checked"
        );

        let clean: Vec<&FunctionSig> = scored
            .iter()
            .filter(|(_, diagnostics)| diagnostics.is_empty())
            .map(|(sig, _)| sig)
            .collect();
        if clean.len() > 1 {
            let diagnostic = self.ambiguity(&target.name, callee_span, args, &arg_types, &clean);
            self.report(diagnostic);
            return None;
        }

        // Fewest diagnostics; `min_by_key` keeps the first of equal keys.
        let (sig, diagnostics) = scored
            .into_iter()
            .min_by_key(|(_, diagnostics)| diagnostics.len())?;
        let is_clean = diagnostics.is_empty();
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }

        let result = match &target.constructs {
            Some(type_name) => type_name.clone(),
            None if sig.is_void() => "Void".to_owned(),
            None => sig.return_type.clone(),
        };
        if is_clean && !arg_types.iter().any(|ty| matches!(ty, ArgType::Unknown)) {
            self.tables.calls.insert(
                ExprRef::new(self.current_unit, call),
                ResolvedCall {
                    sig,
                    parent: target.parent,
                    is_static: target.is_static,
                },
            );
        }
        Some(ResolvedType::Plain(result))
    }

    /// Resolve the callee to the overload set it names.
    fn call_target(&mut self, callee: ExprId, span: Span) -> Option<CallTarget> {
        match self.resolve_type(callee, None)? {
            ResolvedType::FunctionRef {
                owner: None, name, ..
            } => Some(CallTarget {
                candidates: self.tables.top_functions_named(&name).cloned().collect(),
                name,
                parent: None,
                is_static: false,
                constructs: None,
            }),
            ResolvedType::FunctionRef {
                owner: Some(owner),
                name,
                is_static,
            } => {
                let candidates = self
                    .tables
                    .structs
                    .get(&owner)
                    .map(|s| s.methods_named(&name, is_static).cloned().collect())
                    .unwrap_or_default();
                Some(CallTarget {
                    name,
                    parent: Some(owner),
                    is_static,
                    candidates,
                    constructs: None,
                })
            }
            ResolvedType::Metatype(owner) => {
                let Some(initializers) = self
                    .tables
                    .structs
                    .get(&owner)
                    .map(|s| s.initializers.clone())
                else {
                    self.report(
                        Diagnostic::new(DiagnosticId::CannotCallNonFunction)
                            .with_args(&[&format!("{owner}.Type")])
                            .with_label(span, ""),
                    );
                    return None;
                };
                if initializers.is_empty() {
                    self.report(
                        Diagnostic::new(DiagnosticId::NoInitializer)
                            .with_args(&[&owner])
                            .with_label(span, ""),
                    );
                    return None;
                }
                Some(CallTarget {
                    name: "init".to_owned(),
                    candidates: initializers,
                    parent: Some(owner.clone()),
                    is_static: true,
                    constructs: Some(owner),
                })
            }
            ResolvedType::Plain(type_name) => {
                self.report(
                    Diagnostic::new(DiagnosticId::CannotCallNonFunction)
                        .with_args(&[&type_name])
                        .with_label(span, ""),
                );
                None
            }
        }
    }

    fn classify_arg(&mut self, arg: &CallArg) -> ArgType {
        if let ExprKind::Member { base: None, member } = &self.unit().expr(arg.value).kind {
            return ArgType::Implicit(member.text.clone());
        }
        match self.resolve_value_type(arg.value, None) {
            Some(type_name) => ArgType::Known(type_name),
            None => ArgType::Unknown,
        }
    }

    /// Diagnostics this candidate would produce for the call.
    fn check_candidate(
        &self,
        sig: &FunctionSig,
        args: &[CallArg],
        arg_types: &[ArgType],
        awaited: bool,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for ((arg, param), arg_type) in args.iter().zip(&sig.params).zip(arg_types) {
            let label = arg.label_text();
            let label_span = arg.label.as_ref().map_or(arg.span, |l| l.span);
            if param.name == "_" && label != "_" {
                diagnostics.push(
                    Diagnostic::new(DiagnosticId::CallExtraneousArgumentLabel)
                        .with_args(&[label])
                        .with_label(label_span, "remove the label"),
                );
            } else if param.name != "_" && label == "_" {
                diagnostics.push(
                    Diagnostic::new(DiagnosticId::CallMissingArgumentLabel)
                        .with_args(&[&param.name])
                        .with_label(arg.span, ""),
                );
            } else if label != param.name {
                diagnostics.push(
                    Diagnostic::new(DiagnosticId::CallIncorrectArgumentLabel)
                        .with_args(&[label, param.name.as_str()])
                        .with_label(label_span, ""),
                );
            }

            let value_span = self.unit().expr(arg.value).span;
            match arg_type {
                ArgType::Known(found) if *found != param.type_name => {
                    diagnostics.push(messages::argument_type_mismatch(
                        value_span,
                        found,
                        &param.type_name,
                    ));
                }
                ArgType::Implicit(member)
                    if !self.implicit_member_matches(&param.type_name, member) =>
                {
                    diagnostics.push(
                        Diagnostic::new(DiagnosticId::TypeHasNoMember)
                            .with_args(&[param.type_name.as_str(), member.as_str()])
                            .with_label(value_span, ""),
                    );
                }
                _ => {}
            }
        }
        if awaited && !sig.is_async {
            diagnostics.push(
                Diagnostic::new(DiagnosticId::AwaitNonAsyncCall)
                    .with_args(&[&sig.name])
                    .with_note(format!("candidate: {sig}")),
            );
        }
        diagnostics
    }

    /// Diagnostic for a call more than one candidate accepts cleanly.
    fn ambiguity(
        &self,
        name: &str,
        callee_span: Span,
        args: &[CallArg],
        arg_types: &[ArgType],
        clean: &[&FunctionSig],
    ) -> Diagnostic {
        // An implicit member whose parameter type differs between the
        // accepting candidates is what made the call ambiguous.
        let implicit = arg_types.iter().enumerate().find_map(|(i, ty)| match ty {
            ArgType::Implicit(member)
                if clean
                    .windows(2)
                    .any(|pair| pair[0].params[i].type_name != pair[1].params[i].type_name) =>
            {
                Some((i, member))
            }
            _ => None,
        });

        let diagnostic = match implicit {
            Some((i, member)) => Diagnostic::new(DiagnosticId::CallAmbiguousMemberOverload)
                .with_args(&[member.as_str(), name])
                .with_label(self.unit().expr(args[i].value).span, ""),
            None => Diagnostic::new(DiagnosticId::CallAmbiguousOverload)
                .with_args(&[name])
                .with_label(callee_span, ""),
        };
        clean.iter().fold(diagnostic, |diagnostic, sig| {
            diagnostic.with_note(format!("candidate: {sig}"))
        })
    }
}
