//! Diagnostic system for Zeile story scripts.
//!
//! Every phase reports problems as [`Diagnostic`] values instead of failing:
//! - A stable id from the fixed catalog ([`DiagnosticId`]) for tooling and tests
//! - A severity (error, warning, note, remark)
//! - A message, a primary span and the unit it belongs to
//!
//! A batch "has an error" iff any entry has error severity (see
//! [`HasError`]); downstream IR must not be trusted when it does.

mod catalog;
mod diagnostic;
pub mod emitter;
pub mod span_utils;

pub use catalog::DiagnosticId;
pub use diagnostic::{messages, Diagnostic, HasError, Label, Severity};
