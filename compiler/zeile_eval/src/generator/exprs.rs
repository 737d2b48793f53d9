//! Expression evaluation.

use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{mangle, ExprId, ExprKind, Ident, StrSegment};
use zeile_sema::ExprRef;

use super::{declared_at, IrGenerator};
use crate::RuntimeObject;

/// What the frames say about a name.
enum FrameLookup {
    Bound(RuntimeObject),
    /// Declared in a running block at or after the item being run.
    NotYetInitialized,
    /// Declared earlier, but its initializer produced no value.
    Unbound,
    Missing,
}

impl<'a> IrGenerator<'a> {
    /// Evaluate an expression. `None` means no value: either sema already
    /// reported the problem, or it is reported here.
    ///
    /// `expected` is the contextual type, used only by implicit members.
    pub(super) fn eval_expr(&mut self, id: ExprId, expected: Option<&str>) -> Option<RuntimeObject> {
        let expr = self.unit().expr(id);
        match &expr.kind {
            ExprKind::Int(v) => Some(RuntimeObject::int(*v)),
            ExprKind::Float(bits) => Some(RuntimeObject::float(f64::from_bits(*bits))),
            ExprKind::Bool(v) => Some(RuntimeObject::bool(*v)),
            ExprKind::Str(segments) => {
                let mut text = String::new();
                for segment in segments {
                    match segment {
                        StrSegment::Text(part) => text.push_str(part),
                        StrSegment::Interpolation(inner) => {
                            let value = self.eval_expr(*inner, None)?;
                            text.push_str(&value.to_string());
                        }
                    }
                }
                Some(RuntimeObject::string(text))
            }
            ExprKind::Ref(ident) => self.eval_ref(ident),
            ExprKind::Member {
                base: Some(base),
                member,
            } => self.eval_member(*base, member),
            ExprKind::Member { base: None, member } => {
                let expected = expected?;
                self.implicit_member(expected, &member.text)
            }
            ExprKind::Call { callee, args } => self.eval_call(id, *callee, args),
            ExprKind::Sequence { .. } | ExprKind::Infix { .. } => self.eval_operators(id),
            ExprKind::Closure(_) => {
                let env = self.closure_envs.len();
                self.closure_envs.push(self.frames.clone());
                Some(RuntimeObject::closure(self.current_unit, id, env))
            }
            ExprKind::Await(inner) => self.eval_expr(*inner, expected),
            ExprKind::Unsupported(_) => None,
        }
    }

    fn eval_ref(&mut self, ident: &Ident) -> Option<RuntimeObject> {
        let name = ident.text.as_str();
        match self.lookup_frames(name) {
            FrameLookup::Bound(value) => return Some(value),
            FrameLookup::NotYetInitialized => {
                self.report(
                    Diagnostic::new(DiagnosticId::UsedBeforeInitialization)
                        .with_args(&[name])
                        .with_label(ident.span, ""),
                );
                return None;
            }
            FrameLookup::Unbound => return None,
            FrameLookup::Missing => {}
        }
        if let Some(value) = self.global_cache.get(name) {
            return Some(value.clone());
        }
        let tables = self.tables;
        let functions: Vec<String> = tables
            .top_functions_named(name)
            .map(|sig| mangle(sig, None, false))
            .collect();
        if !functions.is_empty() {
            return Some(RuntimeObject::functions(functions, None));
        }
        tables
            .is_type(name)
            .then(|| RuntimeObject::metatype(name))
    }

    fn lookup_frames(&self, name: &str) -> FrameLookup {
        let unit = self.unit();
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.bindings.get(name) {
                return FrameLookup::Bound(value.clone());
            }
            match declared_at(unit, frame.block, name) {
                Some(index) if index >= frame.position => return FrameLookup::NotYetInitialized,
                Some(_) => return FrameLookup::Unbound,
                None => {}
            }
        }
        FrameLookup::Missing
    }

    fn eval_member(&mut self, base: ExprId, member: &Ident) -> Option<RuntimeObject> {
        let base = self.eval_expr(base, None)?;
        let name = member.text.as_str();
        if let Some(owner) = base.metatype_name() {
            let owner = owner.to_owned();
            return self.static_member(&owner, name);
        }
        if let Some(field) = base.field(name) {
            return Some(field);
        }
        let tables = self.tables;
        let methods: Vec<String> = tables
            .structs
            .get(&base.ty)?
            .methods_named(name, false)
            .map(|sig| mangle(sig, Some(&base.ty), false))
            .collect();
        (!methods.is_empty()).then(|| RuntimeObject::functions(methods, Some(base)))
    }

    /// `Owner.name`: an enum case, static variable or static method bundle.
    fn static_member(&mut self, owner: &str, name: &str) -> Option<RuntimeObject> {
        let tables = self.tables;
        if let Some(resolved) = tables.enums.get(owner) {
            return resolved
                .has_case(name)
                .then(|| RuntimeObject::enum_case(owner, name));
        }
        let resolved = tables.structs.get(owner)?;
        if let Some(var) = resolved.static_vars.get(name) {
            let key = format!("{owner}.{name}");
            return self.static_value(key, var.initializer, &var.type_name);
        }
        let methods: Vec<String> = resolved
            .methods_named(name, true)
            .map(|sig| mangle(sig, Some(owner), true))
            .collect();
        (!methods.is_empty()).then(|| RuntimeObject::functions(methods, None))
    }

    /// `.name` against the contextual type: an enum case or a static
    /// variable.
    fn implicit_member(&mut self, expected: &str, name: &str) -> Option<RuntimeObject> {
        let tables = self.tables;
        if let Some(resolved) = tables.enums.get(expected) {
            return resolved
                .has_case(name)
                .then(|| RuntimeObject::enum_case(expected, name));
        }
        let var = tables.structs.get(expected)?.static_vars.get(name)?;
        self.static_value(format!("{expected}.{name}"), var.initializer, &var.type_name)
    }

    /// Value of a static variable, evaluating its initializer on first use.
    fn static_value(
        &mut self,
        key: String,
        initializer: Option<ExprRef>,
        type_name: &'a str,
    ) -> Option<RuntimeObject> {
        if let Some(value) = self.global_cache.get(&key) {
            return Some(value.clone());
        }
        let init = initializer?;
        // Sema reports the cycle.
        if !self.evaluating.insert(key.clone()) {
            return None;
        }
        let saved_frames = std::mem::take(&mut self.frames);
        let saved_unit = std::mem::replace(&mut self.current_unit, init.unit);
        let value = self.eval_expr(init.expr, Some(type_name));
        self.current_unit = saved_unit;
        self.frames = saved_frames;
        self.evaluating.remove(&key);

        let value = value?;
        self.global_cache.insert(key, value.clone());
        Some(value)
    }
}
