//! Resolved declaration tables.
//!
//! Written only by [`SemaEvaluator`](crate::SemaEvaluator); IR generation and
//! symbolization read them.

use rustc_hash::FxHashMap;
use zeile_ir::{mangle, ExprId, FunctionSig, Locale, UnitId};

/// Location of an expression across units.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRef {
    pub unit: UnitId,
    pub expr: ExprId,
}

impl ExprRef {
    pub const fn new(unit: UnitId, expr: ExprId) -> Self {
        ExprRef { unit, expr }
    }
}

/// A checked variable: its type and where its initializer lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableEntry {
    pub type_name: String,
    pub initializer: Option<ExprRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedStruct {
    pub static_methods: Vec<FunctionSig>,
    pub instance_methods: Vec<FunctionSig>,
    pub initializers: Vec<FunctionSig>,
    pub static_vars: FxHashMap<String, VariableEntry>,
    pub instance_vars: FxHashMap<String, VariableEntry>,
}

impl ResolvedStruct {
    /// Instance or static methods named `name`, in declaration order.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
        is_static: bool,
    ) -> impl Iterator<Item = &'a FunctionSig> + 'a {
        let methods = if is_static {
            &self.static_methods
        } else {
            &self.instance_methods
        };
        methods.iter().filter(move |sig| sig.name == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedEnum {
    /// Case names in declaration order, without duplicates.
    pub cases: Vec<String>,
}

impl ResolvedEnum {
    pub fn has_case(&self, name: &str) -> bool {
        self.cases.iter().any(|case| case == name)
    }
}

/// The overload chosen for one call expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCall {
    pub sig: FunctionSig,
    /// Owning struct, `None` for top-level functions.
    pub parent: Option<String>,
    pub is_static: bool,
}

impl ResolvedCall {
    /// The dispatch key of the chosen overload.
    pub fn mangled(&self) -> String {
        mangle(&self.sig, self.parent.as_deref(), self.is_static)
    }
}

pub type ResolvedCallMap = FxHashMap<ExprRef, ResolvedCall>;

/// Everything semantic analysis learned about a script.
#[derive(Clone, Debug, Default)]
pub struct SemaTables {
    pub structs: FxHashMap<String, ResolvedStruct>,
    pub enums: FxHashMap<String, ResolvedEnum>,
    /// Top-level functions in declaration order.
    pub top_functions: Vec<FunctionSig>,
    pub top_vars: FxHashMap<String, VariableEntry>,
    pub calls: ResolvedCallMap,
    /// Locale selected by the last valid shebang.
    pub locale: Locale,
}

impl SemaTables {
    /// Whether `name` is a declared struct or enum.
    pub fn is_type(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.enums.contains_key(name)
    }

    pub fn top_functions_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FunctionSig> + 'a {
        self.top_functions.iter().filter(move |sig| sig.name == name)
    }

    pub fn resolved_call(&self, unit: UnitId, expr: ExprId) -> Option<&ResolvedCall> {
        self.calls.get(&ExprRef::new(unit, expr))
    }
}
