//! Runtime object model.
//!
//! Every value the generator handles is a [`RuntimeObject`]: a type tag plus
//! named storage slots. Slot names starting with `_` are reserved:
//!
//! - `_value`: the payload of a literal (`Int`, `Float`, `Bool`, `String`)
//! - `_case`: the case name of an enum value
//! - `_count`, `_0`.. `_N`, `_self`: a bound function bundle
//! - `_unit`, `_expr`, `_env`: a closure
//!
//! Objects are never mutated after construction.

use std::fmt;

use rustc_hash::FxHashMap;
use zeile_ir::{ExprId, UnitId};

/// Type tag of a bound function bundle.
pub const FUNCTIONS_TYPE: &str = "Functions";

/// Type tag of the result of a call returning nothing.
pub const VOID_TYPE: &str = "Void";

const METATYPE_SUFFIX: &str = ".Type";

/// A scalar payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Trivial {
    Int(i64),
    Bool(bool),
    Float(f64),
    String(String),
}

impl Trivial {
    /// Name of the standard library type carrying this payload.
    pub fn type_name(&self) -> &'static str {
        match self {
            Trivial::Int(_) => "Int",
            Trivial::Bool(_) => "Bool",
            Trivial::Float(_) => "Float",
            Trivial::String(_) => "String",
        }
    }

    /// Wrap into a literal object.
    pub fn into_object(self) -> RuntimeObject {
        RuntimeObject::new(self.type_name()).with_storage("_value", Storage::Trivial(self))
    }
}

impl fmt::Display for Trivial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trivial::Int(v) => write!(f, "{v}"),
            Trivial::Bool(v) => write!(f, "{v}"),
            Trivial::Float(v) => write!(f, "{v}"),
            Trivial::String(v) => f.write_str(v),
        }
    }
}

/// One storage slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    Trivial(Trivial),
    NonTrivial(RuntimeObject),
}

impl Storage {
    /// The slot's value as an object; scalars are wrapped as literals.
    pub fn to_object(&self) -> RuntimeObject {
        match self {
            Storage::Trivial(t) => t.clone().into_object(),
            Storage::NonTrivial(object) => object.clone(),
        }
    }
}

impl From<RuntimeObject> for Storage {
    /// Literal objects collapse to their payload.
    fn from(object: RuntimeObject) -> Self {
        match object.value() {
            Some(t) if object.storages.len() == 1 && object.ty == t.type_name() => {
                Storage::Trivial(t.clone())
            }
            _ => Storage::NonTrivial(object),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RuntimeObject {
    pub ty: String,
    pub storages: FxHashMap<String, Storage>,
}

impl RuntimeObject {
    pub fn new(ty: impl Into<String>) -> Self {
        RuntimeObject {
            ty: ty.into(),
            storages: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_storage(mut self, name: impl Into<String>, storage: Storage) -> Self {
        self.storages.insert(name.into(), storage);
        self
    }

    // -- Literals --

    pub fn int(value: i64) -> Self {
        Trivial::Int(value).into_object()
    }

    pub fn float(value: f64) -> Self {
        Trivial::Float(value).into_object()
    }

    pub fn bool(value: bool) -> Self {
        Trivial::Bool(value).into_object()
    }

    pub fn string(value: impl Into<String>) -> Self {
        Trivial::String(value.into()).into_object()
    }

    pub fn void() -> Self {
        RuntimeObject::new(VOID_TYPE)
    }

    /// Literal payload, if this is a literal.
    pub fn value(&self) -> Option<&Trivial> {
        match self.storages.get("_value")? {
            Storage::Trivial(t) => Some(t),
            Storage::NonTrivial(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value()? {
            Trivial::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value()? {
            Trivial::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value()? {
            Trivial::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.value()? {
            Trivial::String(v) => Some(v),
            _ => None,
        }
    }

    /// A stored member as an object.
    pub fn field(&self, name: &str) -> Option<RuntimeObject> {
        self.storages.get(name).map(Storage::to_object)
    }

    // -- Enums --

    pub fn enum_case(ty: impl Into<String>, case: impl Into<String>) -> Self {
        RuntimeObject::new(ty).with_storage("_case", Storage::Trivial(Trivial::String(case.into())))
    }

    pub fn case_name(&self) -> Option<&str> {
        match self.storages.get("_case")? {
            Storage::Trivial(Trivial::String(case)) => Some(case),
            _ => None,
        }
    }

    // -- Metatypes --

    pub fn metatype(type_name: &str) -> Self {
        RuntimeObject::new(format!("{type_name}{METATYPE_SUFFIX}"))
    }

    /// `T` for an object of type `T.Type`.
    pub fn metatype_name(&self) -> Option<&str> {
        self.ty.strip_suffix(METATYPE_SUFFIX)
    }

    // -- Function bundles --

    /// Bundle of overloads by mangled name, bound to `receiver` for
    /// instance methods.
    pub fn functions(mangled: Vec<String>, receiver: Option<RuntimeObject>) -> Self {
        let count = i64::try_from(mangled.len()).unwrap_or(i64::MAX);
        let mut object = RuntimeObject::new(FUNCTIONS_TYPE)
            .with_storage("_count", Storage::Trivial(Trivial::Int(count)));
        for (i, name) in mangled.into_iter().enumerate() {
            object
                .storages
                .insert(format!("_{i}"), Storage::Trivial(Trivial::String(name)));
        }
        if let Some(receiver) = receiver {
            object
                .storages
                .insert("_self".to_owned(), Storage::NonTrivial(receiver));
        }
        object
    }

    pub fn is_functions(&self) -> bool {
        self.ty == FUNCTIONS_TYPE
    }

    /// Mangled names of a function bundle, in bundle order.
    pub fn function_names(&self) -> Vec<&str> {
        let count = match self.storages.get("_count") {
            Some(Storage::Trivial(Trivial::Int(n))) => usize::try_from(*n).unwrap_or(0),
            _ => 0,
        };
        (0..count)
            .filter_map(|i| match self.storages.get(&format!("_{i}")) {
                Some(Storage::Trivial(Trivial::String(name))) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Receiver bound to an instance-method bundle.
    pub fn bound_self(&self) -> Option<&RuntimeObject> {
        match self.storages.get("_self")? {
            Storage::NonTrivial(receiver) => Some(receiver),
            Storage::Trivial(_) => None,
        }
    }

    // -- Closures --

    /// A closure over the expression `expr` of `unit`, capturing the
    /// environment registered under `env`.
    pub fn closure(unit: UnitId, expr: ExprId, env: usize) -> Self {
        let slot = |raw: i64| Storage::Trivial(Trivial::Int(raw));
        RuntimeObject::new("Closure")
            .with_storage("_unit", slot(i64::from(unit.raw())))
            .with_storage("_expr", slot(i64::from(expr.raw())))
            .with_storage("_env", slot(i64::try_from(env).unwrap_or(i64::MAX)))
    }

    /// `(unit, expr, env)` of a closure.
    pub fn closure_target(&self) -> Option<(UnitId, ExprId, usize)> {
        let slot = |name: &str| match self.storages.get(name)? {
            Storage::Trivial(Trivial::Int(v)) => Some(*v),
            _ => None,
        };
        Some((
            UnitId::new(u32::try_from(slot("_unit")?).ok()?),
            ExprId::new(u32::try_from(slot("_expr")?).ok()?),
            usize::try_from(slot("_env")?).ok()?,
        ))
    }
}

/// Text of a value inside string interpolation.
impl fmt::Display for RuntimeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.value() {
            return write!(f, "{value}");
        }
        if let Some(case) = self.case_name() {
            return f.write_str(case);
        }
        if let Some(name) = self.storages.get("name") {
            return write!(f, "{}", name.to_object());
        }
        f.write_str(&self.ty)
    }
}

/// Arguments handed to a native function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionArgs {
    /// Receiver of an instance method.
    pub implicit_self: Option<RuntimeObject>,
    pub buffer: Vec<RuntimeObject>,
}

impl FunctionArgs {
    pub fn arg(&self, index: usize) -> Option<&RuntimeObject> {
        self.buffer.get(index)
    }
}

#[cfg(test)]
mod tests;
