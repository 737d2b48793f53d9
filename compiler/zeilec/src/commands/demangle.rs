//! The `demangle` command: decode mangled function names.

use zeile_ir::{demangle, mangle::is_zeile_symbol};

/// Readable form of `symbol`; anything that does not demangle comes back
/// unchanged.
pub fn demangled_text(symbol: &str) -> String {
    if !is_zeile_symbol(symbol) {
        return symbol.to_owned();
    }
    match demangle(symbol) {
        Some(demangled) => demangled.to_string(),
        None => symbol.to_owned(),
    }
}

pub fn demangle_symbol(symbol: &str) {
    println!("{}", demangled_text(symbol));
}
