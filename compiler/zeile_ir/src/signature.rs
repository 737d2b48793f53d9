//! Function signatures as seen by overload resolution and mangling.

use std::fmt;

/// One parameter: its argument label and its resolved type name.
///
/// A label of `_` marks an argument passed without a label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

impl Param {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A checked function signature.
///
/// An empty `return_type` means `Void`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: String,
    pub is_async: bool,
}

impl FunctionSig {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionSig {
            name: name.into(),
            ..FunctionSig::default()
        }
    }

    #[must_use]
    pub fn param(mut self, name: &str, type_name: &str) -> Self {
        self.params.push(Param::new(name, type_name));
        self
    }

    #[must_use]
    pub fn returns(mut self, type_name: &str) -> Self {
        self.return_type = type_name.to_owned();
        self
    }

    #[must_use]
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn is_void(&self) -> bool {
        self.return_type.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Same name and parameter list (labels and types).
    ///
    /// Two declarations with the same shape are redeclarations of each
    /// other regardless of return type or effects.
    pub fn same_shape(&self, other: &FunctionSig) -> bool {
        self.name == other.name && self.params == other.params
    }
}

/// Renders as `name(label: Type, ...) async -> Return`.
impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.type_name)?;
        }
        write!(f, ")")?;
        if self.is_async {
            write!(f, " async")?;
        }
        if !self.is_void() {
            write!(f, " -> {}", self.return_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let sig = FunctionSig::new("say")
            .param("_", "String")
            .param("speaker", "Character");
        assert_eq!(sig.to_string(), "say(_: String, speaker: Character)");

        let sig = FunctionSig::new("delay")
            .param("seconds", "Float")
            .asynchronous()
            .returns("Int");
        assert_eq!(sig.to_string(), "delay(seconds: Float) async -> Int");
    }

    #[test]
    fn test_same_shape_ignores_effects() {
        let a = FunctionSig::new("f").param("x", "Int");
        let b = FunctionSig::new("f").param("x", "Int").asynchronous();
        let c = FunctionSig::new("f").param("y", "Int");
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
