//! Zeile compiler driver.
//!
//! Runs the whole pipeline over a script: the standard library unit is
//! prepended, semantic analysis checks every unit, the IR generator
//! interprets the checked tree and the codec packs the resulting story.
//!
//! # Module Structure
//!
//! - `builder`: [`StoryBuilder`] and its [`BuildOptions`]
//! - `cache`: [`CompileCache`], the host-owned cache of the last analysis
//! - `commands`: handlers behind the `zeile` command-line tool
//! - `tracing_setup`: subscriber initialisation for debug output

mod builder;
mod cache;
pub mod commands;
pub mod tracing_setup;

pub use builder::{Build, BuildError, BuildOptions, StoryBuilder};
pub use cache::{CachedSema, CompileCache, Fingerprint};
