//! Dispatch table of native functions, keyed by mangled name.
//!
//! Native functions are the only code that appends step actions to the
//! story. They reach the generator through a [`NativeCx`].

use std::fmt;

use rustc_hash::FxHashMap;
use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{Locale, StepAction};

use crate::generator::IrGenerator;
use crate::{natives, FunctionArgs, RuntimeObject};

/// A native implementation. Returning `None` means the call produced no
/// value; the generator does not report anything for it.
pub type NativeFn = fn(&mut NativeCx<'_, '_>, &FunctionArgs) -> Option<RuntimeObject>;

#[derive(Clone, Default)]
pub struct VTable {
    table: FxHashMap<String, NativeFn>,
}

impl VTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with every standard library native registered.
    pub fn with_stdlib() -> Self {
        let mut vtable = Self::new();
        natives::register_stdlib(&mut vtable);
        vtable
    }

    /// Register `native` under `mangled`, returning the entry it replaced.
    pub fn register(&mut self, mangled: impl Into<String>, native: NativeFn) -> Option<NativeFn> {
        self.table.insert(mangled.into(), native)
    }

    /// Copy every entry of `other` into this table, replacing clashes.
    pub fn extend_from(&mut self, other: &VTable) {
        self.table
            .extend(other.table.iter().map(|(key, native)| (key.clone(), *native)));
    }

    pub fn get(&self, mangled: &str) -> Option<NativeFn> {
        self.table.get(mangled).copied()
    }

    pub fn contains(&self, mangled: &str) -> bool {
        self.table.contains_key(mangled)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Registered names, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.table.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for VTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

/// What a native function may do to the generator.
pub struct NativeCx<'g, 'a> {
    pub(crate) generator: &'g mut IrGenerator<'a>,
}

impl NativeCx<'_, '_> {
    /// Append an action to the innermost open action list.
    pub fn emit(&mut self, action: StepAction) {
        self.generator.emit(action);
    }

    /// Run a closure's body and return the actions it emitted instead of
    /// appending them.
    pub fn capture(&mut self, closure: &RuntimeObject) -> Option<Vec<StepAction>> {
        self.generator.capture_closure(closure)
    }

    /// Locale the story is generated for.
    pub fn locale(&self) -> Locale {
        self.generator.locale()
    }

    /// Display name of character `id`, empty if the roster does not know it.
    ///
    /// Spaces are removed, matching how names are shown in dialogue.
    pub fn character_name(&self, id: i64) -> String {
        self.generator
            .roster()
            .character_name(id, self.locale())
            .map(|name| name.replace(' ', ""))
            .unwrap_or_default()
    }

    /// Report an argument the native cannot use.
    pub fn invalid_argument(&mut self, function: &str, reason: &str) {
        let diagnostic = Diagnostic::new(DiagnosticId::NativeArgumentInvalid)
            .with_args(&[function, reason]);
        self.generator.report_at_call(diagnostic);
    }
}
