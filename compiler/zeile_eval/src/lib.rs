//! Zeile Eval - IR generation for checked story scripts.
//!
//! This crate runs a script that passed semantic analysis and turns its
//! native calls into a [`StoryIr`](zeile_ir::StoryIr).
//!
//! # Architecture
//!
//! The generator uses:
//! - `IrGenerator`: walks units in order with a frame stack per block
//! - `RuntimeObject`: type tag plus named storage, for every value
//! - `VTable`: native functions keyed by mangled name
//! - `CharacterRoster`: display names for character IDs, per locale
//!
//! User code never emits actions directly; every action comes from a
//! native function reached through the vtable.

mod generator;
mod natives;
mod object;
mod roster;
mod vtable;

pub use generator::IrGenerator;
pub use object::{FunctionArgs, RuntimeObject, Storage, Trivial, FUNCTIONS_TYPE, VOID_TYPE};
pub use roster::{CharacterRoster, EmptyRoster, MapRoster};
pub use vtable::{NativeCx, NativeFn, VTable};
