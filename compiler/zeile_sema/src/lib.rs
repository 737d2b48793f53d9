//! Zeile Sema - semantic analysis for story scripts.
//!
//! Walks every unit of a script once, validates declarations against the
//! accepted subset of the language, builds the declaration tables, resolves
//! the type of every expression and the target of every call.
//!
//! # Main Entry Points
//!
//! - [`SemaEvaluator`]: runs the analysis and owns its results
//! - [`Symbolizer`]: lists the mangled names of every declared function
//! - [`stdlib_unit`]: the standard library unit checked before user code
//!
//! # Module Organization
//!
//! - `evaluator`: the checker, split by declaration and expression kind
//! - `tables`: resolved declaration tables and the resolved-call map
//! - `stdlib`: the standard library declarations
//! - `symbolize`: mangled-name universe

mod evaluator;
mod stdlib;
mod symbolize;
mod tables;

pub use evaluator::SemaEvaluator;
pub use stdlib::{stdlib_unit, STDLIB_TYPES, STDLIB_UNIT_NAME};
pub use symbolize::Symbolizer;
pub use tables::{
    ExprRef, ResolvedCall, ResolvedCallMap, ResolvedEnum, ResolvedStruct, SemaTables,
    VariableEntry,
};
