//! The `symbols` command: list the standard library's mangled names.

use zeile_ir::SourceUnit;
use zeile_sema::{stdlib_unit, SemaEvaluator, Symbolizer};

/// Mangled names of every standard library function, sorted.
pub fn stdlib_symbols() -> Vec<String> {
    let units: Vec<SourceUnit> = vec![stdlib_unit()];
    let mut evaluator = SemaEvaluator::new(&units);
    let _ = evaluator.perform_sema();
    let mut symbols = Symbolizer::new(evaluator.tables()).symbolize_all();
    symbols.sort();
    symbols
}

/// Print each symbol, with its demangled form when `demangled` is set.
pub fn list_symbols(demangled: bool) {
    for symbol in stdlib_symbols() {
        if demangled {
            println!("{symbol:<48} {}", super::demangled_text(&symbol));
        } else {
            println!("{symbol}");
        }
    }
}
