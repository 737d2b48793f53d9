//! Zeile IR - Core Data Structures
//!
//! This crate contains the data shared by every phase of the Zeile
//! story-script pipeline:
//! - Spans for source locations
//! - The syntax tree handed over by the parser, with an arena per unit
//! - Function signatures and the mangling scheme keyed on them
//! - The story IR (`StoryIr`/`StepAction`) consumed by playback renderers
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: no `Box<Expr>`, use `ExprId(u32)` indices
//! - **Read-only input**: the tree is built once (by a parser or by
//!   [`UnitBuilder`]) and never mutated by later phases

pub mod ast;
mod ids;
pub mod mangle;
mod signature;
mod span;
pub mod story;

pub use ast::{
    fold_sequence, Attribute, BinaryOp, Binding, Block, CallArg, Decl, DeclKind, EnumCaseDecl,
    EnumCaseElement, EnumDecl, Expr, ExprKind, FoldError, Folded, FunctionDecl, Ident, Item,
    ItemKind, Modifier, ParamDecl, ParseIssue, Pattern, SequenceOperator, Shebang, SourceUnit,
    StrSegment, StructDecl, TypeKind, TypeSyntax, UnitBuilder, VariableDecl,
};
pub use ids::{DeclId, ExprId, UnitId};
pub use mangle::{demangle, mangle, Demangled};
pub use signature::{FunctionSig, Param};
pub use span::Span;
pub use story::{Locale, Position, PositionBase, StepAction, StoryIr};
