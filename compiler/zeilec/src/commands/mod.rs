//! Command handlers for the `zeile` CLI.
//!
//! Each handler prints its result and exits with status 1 on failure. The
//! rendering functions behind them return strings so they can be tested.

mod demangle;
mod explain;
mod inspect;
mod sample;
mod symbols;

pub use demangle::{demangle_symbol, demangled_text};
pub use explain::{explain_diagnostic, explanation, list_diagnostics};
pub use inspect::{inspect_container, render_container, render_container_as, InspectFormat};
pub use sample::{build_sample, sample_unit};
pub use symbols::{list_symbols, stdlib_symbols};
