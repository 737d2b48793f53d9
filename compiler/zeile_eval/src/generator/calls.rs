//! Call dispatch.
//!
//! A call runs only if sema recorded a resolution for it. The callee
//! evaluates to a bundle of overloads; the one matching the recorded
//! signature is looked up in the vtable by its mangled name.

use tracing::trace;
use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{demangle, mangle, CallArg, ExprId};

use super::IrGenerator;
use crate::{FunctionArgs, NativeCx, RuntimeObject};

impl<'a> IrGenerator<'a> {
    pub(super) fn eval_call(
        &mut self,
        call: ExprId,
        callee: ExprId,
        args: &'a [CallArg],
    ) -> Option<RuntimeObject> {
        let span = self.unit().expr(call).span;
        let tables = self.tables;
        let Some(resolved) = tables.resolved_call(self.current_unit, call) else {
            self.report(
                Diagnostic::new(DiagnosticId::UnresolvedCallInIrGen).with_label(span, ""),
            );
            return None;
        };

        let callee = self.eval_expr(callee, None)?;
        let bundle = if let Some(type_name) = callee.metatype_name() {
            let initializers = tables
                .structs
                .get(type_name)?
                .initializers
                .iter()
                .map(|sig| mangle(sig, Some(type_name), true))
                .collect();
            RuntimeObject::functions(initializers, None)
        } else if callee.is_functions() {
            callee
        } else {
            return None;
        };

        let key = bundle
            .function_names()
            .into_iter()
            .filter_map(demangle)
            .find(|d| {
                d.sig == resolved.sig
                    && d.parent == resolved.parent
                    && d.is_static == resolved.is_static
            })?
            .mangle();

        let mut buffer = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(&resolved.sig.params) {
            buffer.push(self.eval_expr(arg.value, Some(param.type_name.as_str()))?);
        }
        let args = FunctionArgs {
            implicit_self: bundle.bound_self().cloned(),
            buffer,
        };

        let Some(native) = self.vtable.get(&key) else {
            self.report(
                Diagnostic::new(DiagnosticId::MissingNativeImplementation)
                    .with_args(&[&key])
                    .with_label(span, ""),
            );
            return None;
        };
        trace!(symbol = %key, "dispatching native");
        let previous = self.call_span.replace(span);
        let result = native(&mut NativeCx { generator: self }, &args);
        self.call_span = previous;
        result
    }
}
