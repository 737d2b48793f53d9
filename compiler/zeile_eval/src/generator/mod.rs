//! IR generation: runs a checked script and collects the step actions its
//! native calls emit.
//!
//! # Module Structure
//!
//! - `exprs`: expression evaluation, name lookup, member access
//! - `calls`: dispatch of resolved calls to the vtable
//! - `operators`: binary operators over literal values

mod calls;
mod exprs;
mod operators;

#[cfg(test)]
mod tests;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use zeile_diagnostic::Diagnostic;
use zeile_ir::{
    Block, DeclKind, ExprKind, ItemKind, Locale, Pattern, SourceUnit, Span, StepAction, StoryIr,
    TypeKind, UnitId,
};
use zeile_sema::SemaTables;

use crate::{CharacterRoster, RuntimeObject, VTable};

/// Bindings of one running block.
#[derive(Clone, Debug)]
struct Frame<'a> {
    block: &'a Block,
    /// Index of the item being run.
    position: usize,
    bindings: FxHashMap<String, RuntimeObject>,
}

impl<'a> Frame<'a> {
    fn new(block: &'a Block) -> Self {
        Frame {
            block,
            position: 0,
            bindings: FxHashMap::default(),
        }
    }
}

/// Generates a [`StoryIr`] from units that passed semantic analysis.
///
/// Units are run in order, top to bottom. Only calls recorded in
/// [`SemaTables::calls`] are dispatched, and only natives registered in the
/// [`VTable`] emit anything.
pub struct IrGenerator<'a> {
    units: &'a [SourceUnit],
    tables: &'a SemaTables,
    vtable: &'a VTable,
    roster: &'a dyn CharacterRoster,
    locale: Locale,
    story: Vec<StepAction>,
    /// Open closure captures, innermost last.
    captures: Vec<Vec<StepAction>>,
    frames: Vec<Frame<'a>>,
    /// Frames as they were when each closure value was created.
    closure_envs: Vec<Vec<Frame<'a>>>,
    /// Values of top-level variables (`name`) and static variables
    /// (`Owner.name`).
    global_cache: FxHashMap<String, RuntimeObject>,
    /// Static variables whose initializer is being evaluated.
    evaluating: FxHashSet<String>,
    diagnostics: Vec<Diagnostic>,
    current_unit: UnitId,
    /// Span of the call whose native is running.
    call_span: Option<Span>,
}

impl<'a> IrGenerator<'a> {
    pub fn new(
        units: &'a [SourceUnit],
        tables: &'a SemaTables,
        vtable: &'a VTable,
        roster: &'a dyn CharacterRoster,
    ) -> Self {
        IrGenerator {
            units,
            tables,
            vtable,
            roster,
            locale: tables.locale,
            story: Vec::new(),
            captures: Vec::new(),
            frames: Vec::new(),
            closure_envs: Vec::new(),
            global_cache: FxHashMap::default(),
            evaluating: FxHashSet::default(),
            diagnostics: Vec::new(),
            current_unit: UnitId::STDLIB,
            call_span: None,
        }
    }

    /// Generate for `locale` instead of the one selected by shebangs.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(units = self.units.len(), locale = self.locale.as_str())
    )]
    pub fn generate(mut self) -> (StoryIr, Vec<Diagnostic>) {
        let units = self.units;
        for (index, unit) in units.iter().enumerate() {
            self.current_unit = UnitId::new(u32::try_from(index).unwrap_or(u32::MAX));
            self.frames.clear();
            self.run_block(unit.block());
        }
        debug!(
            actions = self.story.len(),
            diagnostics = self.diagnostics.len(),
            "ir generation finished"
        );
        (StoryIr::from_parts(self.locale, self.story), self.diagnostics)
    }

    // -- Native-facing --

    pub(crate) fn emit(&mut self, action: StepAction) {
        match self.captures.last_mut() {
            Some(capture) => capture.push(action),
            None => self.story.push(action),
        }
    }

    /// Run a closure's body against the frames it was created in, and
    /// return what it emitted.
    pub(crate) fn capture_closure(&mut self, closure: &RuntimeObject) -> Option<Vec<StepAction>> {
        let (unit, expr, env) = closure.closure_target()?;
        let units = self.units;
        let source = units.get(unit.index())?;
        if expr.index() >= source.expr_count() {
            return None;
        }
        let ExprKind::Closure(block) = &source.expr(expr).kind else {
            return None;
        };
        let snapshot = self.closure_envs.get(env)?.clone();

        let saved_frames = std::mem::replace(&mut self.frames, snapshot);
        let saved_unit = std::mem::replace(&mut self.current_unit, unit);
        self.captures.push(Vec::new());
        self.run_block(block);
        let actions = self.captures.pop().unwrap_or_default();
        self.current_unit = saved_unit;
        self.frames = saved_frames;
        Some(actions)
    }

    pub(crate) fn locale(&self) -> Locale {
        self.locale
    }

    pub(crate) fn roster(&self) -> &dyn CharacterRoster {
        self.roster
    }

    /// Report against the call whose native is running.
    pub(crate) fn report_at_call(&mut self, diagnostic: Diagnostic) {
        let diagnostic = match self.call_span {
            Some(span) => diagnostic.with_label(span, ""),
            None => diagnostic,
        };
        self.report(diagnostic);
    }

    // -- Blocks --

    fn run_block(&mut self, block: &'a Block) {
        self.frames.push(Frame::new(block));
        for (position, item) in block.items.iter().enumerate() {
            if let Some(frame) = self.frames.last_mut() {
                frame.position = position;
            }
            match &item.kind {
                ItemKind::Decl(id) => self.run_decl(*id),
                ItemKind::Expr(id) => {
                    self.eval_expr(*id, None);
                }
                ItemKind::Stmt(_) => {}
                ItemKind::Unrecognized => break,
            }
        }
        self.frames.pop();
    }

    /// Bind the variables of a `let`; other declarations were handled by
    /// semantic analysis.
    fn run_decl(&mut self, id: zeile_ir::DeclId) {
        let DeclKind::Variable(v) = &self.unit().decl(id).kind else {
            return;
        };
        for binding in &v.bindings {
            let (Pattern::Identifier(ident), Some(init)) = (&binding.pattern, binding.initializer)
            else {
                continue;
            };
            let expected = binding.annotation.as_ref().and_then(|ty| match &ty.kind {
                TypeKind::Identifier { name, .. } => Some(name.as_str()),
                _ => None,
            });
            let Some(value) = self.eval_expr(init, expected) else {
                continue;
            };
            if self.frames.len() == 1 {
                self.global_cache.insert(ident.text.clone(), value.clone());
            }
            if let Some(frame) = self.frames.last_mut() {
                frame.bindings.insert(ident.text.clone(), value);
            }
        }
    }

    // -- Helpers --

    fn unit(&self) -> &'a SourceUnit {
        &self.units[self.current_unit.index()]
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic.in_unit(self.current_unit));
    }
}

/// Item index of the `let` binding `name` in `block`.
fn declared_at(unit: &SourceUnit, block: &Block, name: &str) -> Option<usize> {
    block.items.iter().position(|item| {
        let ItemKind::Decl(id) = item.kind else {
            return false;
        };
        let DeclKind::Variable(v) = &unit.decl(id).kind else {
            return false;
        };
        v.bindings
            .iter()
            .any(|b| matches!(&b.pattern, Pattern::Identifier(ident) if ident.text == name))
    })
}
