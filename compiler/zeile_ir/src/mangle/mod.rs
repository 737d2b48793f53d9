//! Symbol mangling for Zeile functions.
//!
//! A mangled name encodes everything overload resolution needs to tell two
//! functions apart, so it doubles as the dispatch key of the interpreter's
//! virtual table.
//!
//! # Grammar
//!
//! ```text
//! mangled-func ::= '$z' parent-spec? signature
//! parent-spec  ::= 'p' name-spec
//! signature    ::= 'f' name-spec argument* effect? return-type
//! argument     ::= name-spec name-spec          // label, type
//! effect       ::= 'e' ('A' | 's' | 'As')       // async, static
//! return-type  ::= 'r' (name-spec | 'V')        // 'V' = Void
//! name-spec    ::= [0-9]+ '$'? name
//! ```
//!
//! The length counts characters. The `$` separator is only emitted when the
//! name itself starts with a digit, which keeps the length prefix
//! unambiguous while every ordinary identifier mangles without it.
//!
//! # Examples
//!
//! - `Character.init(id: Int)` (static) → `$zp9Characterf4init2id3IntesrV`
//! - `say(_: String, speaker: Character)` → `$zf3say1_6String7speaker9CharacterrV`

use std::fmt;

use crate::{FunctionSig, Param};

/// Prefix shared by every mangled Zeile symbol.
pub const MANGLING_PREFIX: &str = "$z";

const NAME_SEPARATOR: char = '$';

/// Mangle a function signature with its owning type and staticness.
pub fn mangle(sig: &FunctionSig, parent: Option<&str>, is_static: bool) -> String {
    let mut result = String::from(MANGLING_PREFIX);

    if let Some(parent) = parent {
        result.push('p');
        push_name_spec(&mut result, parent);
    }

    result.push('f');
    push_name_spec(&mut result, &sig.name);

    for param in &sig.params {
        push_name_spec(&mut result, &param.name);
        push_name_spec(&mut result, &param.type_name);
    }

    if sig.is_async || is_static {
        result.push('e');
        if sig.is_async {
            result.push('A');
        }
        if is_static {
            result.push('s');
        }
    }

    result.push('r');
    if sig.is_void() {
        result.push('V');
    } else {
        push_name_spec(&mut result, &sig.return_type);
    }

    result
}

fn push_name_spec(out: &mut String, name: &str) {
    out.push_str(&name.chars().count().to_string());
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        out.push(NAME_SEPARATOR);
    }
    out.push_str(name);
}

/// Result of demangling: the signature plus its qualification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Demangled {
    pub sig: FunctionSig,
    pub parent: Option<String>,
    pub is_static: bool,
}

impl Demangled {
    /// Mangle back to the canonical symbol.
    pub fn mangle(&self) -> String {
        mangle(&self.sig, self.parent.as_deref(), self.is_static)
    }
}

/// Renders as `static Parent.name(label: Type) async -> Return`.
impl fmt::Display for Demangled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        if let Some(parent) = &self.parent {
            write!(f, "{parent}.")?;
        }
        write!(f, "{}", self.sig)
    }
}

/// Check whether a string looks like a mangled Zeile symbol.
pub fn is_zeile_symbol(symbol: &str) -> bool {
    symbol.starts_with(MANGLING_PREFIX)
}

/// Demangle a symbol produced by [`mangle`].
///
/// Returns `None` on any malformed input: wrong prefix, a length prefix
/// running past the end, an odd number of parameter segments, an unknown
/// effect marker, a missing return marker, or trailing characters.
pub fn demangle(symbol: &str) -> Option<Demangled> {
    let mut cursor = Cursor {
        rest: symbol.strip_prefix(MANGLING_PREFIX)?,
    };

    let mut parent = None;
    let mut spec = cursor.next_char()?;
    if spec == 'p' {
        parent = Some(cursor.name_spec()?);
        spec = cursor.next_char()?;
    }
    if spec != 'f' {
        return None;
    }

    let name = cursor.name_spec()?;

    let mut segments = Vec::new();
    while cursor.at_digit() {
        segments.push(cursor.name_spec()?);
    }
    if segments.len() % 2 != 0 {
        return None;
    }
    let mut params = Vec::with_capacity(segments.len() / 2);
    let mut segments = segments.into_iter();
    while let (Some(label), Some(type_name)) = (segments.next(), segments.next()) {
        params.push(Param {
            name: label,
            type_name,
        });
    }

    let mut is_async = false;
    let mut is_static = false;
    spec = cursor.next_char()?;
    if spec == 'e' {
        if cursor.eat("As") {
            is_async = true;
            is_static = true;
        } else if cursor.eat("s") {
            is_static = true;
        } else if cursor.eat("A") {
            is_async = true;
        } else {
            return None;
        }
        spec = cursor.next_char()?;
    }

    if spec != 'r' {
        return None;
    }
    let return_type = if cursor.eat("V") {
        String::new()
    } else {
        let return_type = cursor.name_spec()?;
        // An empty return name would mangle as 'V'.
        if return_type.is_empty() {
            return None;
        }
        return_type
    };

    if !cursor.rest.is_empty() {
        return None;
    }

    Some(Demangled {
        sig: FunctionSig {
            name,
            params,
            return_type,
            is_async,
        },
        parent,
        is_static,
    })
}

struct Cursor<'a> {
    rest: &'a str,
}

impl Cursor<'_> {
    fn next_char(&mut self) -> Option<char> {
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn at_digit(&self) -> bool {
        self.rest.starts_with(|c: char| c.is_ascii_digit())
    }

    /// Read `[0-9]+ '$'? name`, where the digits give the name's length in
    /// characters.
    fn name_spec(&mut self) -> Option<String> {
        let digits = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        // Leading zeros would give one name several spellings.
        if digits == 0 || (digits > 1 && self.rest.starts_with('0')) {
            return None;
        }
        let count: usize = self.rest[..digits].parse().ok()?;
        let mut body = &self.rest[digits..];

        let separated = body.starts_with(NAME_SEPARATOR);
        if separated {
            body = &body[NAME_SEPARATOR.len_utf8()..];
        }

        let end = match body.char_indices().nth(count) {
            Some((offset, _)) => offset,
            None if body.chars().count() == count => body.len(),
            None => return None,
        };
        let name = &body[..end];

        // Only canonical encodings are accepted: the separator appears
        // exactly when the name starts with a digit.
        if separated != name.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        self.rest = &body[end..];
        Some(name.to_owned())
    }
}
