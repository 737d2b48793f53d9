//! Semantic evaluator core.
//!
//! # Module Structure
//!
//! - `resolved_type`: what an expression resolves to, and written types
//! - `decls`: enum, struct, function and variable declaration checks
//! - `exprs`: expression type resolution
//! - `calls`: overload resolution
//! - `shebang`: the per-unit `key = value` header

mod calls;
mod decls;
mod exprs;
mod resolved_type;
mod shebang;

#[cfg(test)]
mod tests;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{Block, DeclKind, ItemKind, SourceUnit, UnitId};

use crate::SemaTables;

pub(crate) use resolved_type::ResolvedType;

/// Semantic analysis over the units of one script.
///
/// Unit 0 is expected to be the standard library
/// ([`stdlib_unit`](crate::stdlib_unit)); literal types are looked up in it.
pub struct SemaEvaluator<'a> {
    units: &'a [SourceUnit],
    tables: SemaTables,
    diagnostics: Vec<Diagnostic>,
    /// Unit whose items are being checked.
    current_unit: UnitId,
    /// Struct and enum names declared anywhere, so that written types may
    /// refer to declarations further down.
    declared_types: FxHashSet<String>,
    /// Qualified names of variables whose initializer is being checked.
    checking: FxHashSet<String>,
    /// Closure-local bindings, innermost scope last.
    scopes: Vec<FxHashMap<String, String>>,
}

impl<'a> SemaEvaluator<'a> {
    pub fn new(units: &'a [SourceUnit]) -> Self {
        SemaEvaluator {
            units,
            tables: SemaTables::default(),
            diagnostics: Vec::new(),
            current_unit: UnitId::STDLIB,
            declared_types: FxHashSet::default(),
            checking: FxHashSet::default(),
            scopes: Vec::new(),
        }
    }

    pub fn units(&self) -> &'a [SourceUnit] {
        self.units
    }

    pub fn tables(&self) -> &SemaTables {
        &self.tables
    }

    pub fn into_tables(self) -> SemaTables {
        self.tables
    }

    /// Run the whole analysis.
    ///
    /// Clears the results of any earlier run first, so calling this twice
    /// yields the same tables and diagnostics.
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.units.len()))]
    pub fn perform_sema(&mut self) -> Vec<Diagnostic> {
        self.tables = SemaTables::default();
        self.diagnostics.clear();
        self.checking.clear();
        self.scopes.clear();
        self.collect_declared_types();

        let units = self.units;
        for (index, unit) in units.iter().enumerate() {
            self.current_unit = UnitId::new(u32::try_from(index).unwrap_or(u32::MAX));
            self.pass_through_parse_issues(unit);
            self.apply_shebang(unit);
            self.check_unit(unit);
        }

        debug!(
            diagnostics = self.diagnostics.len(),
            calls = self.tables.calls.len(),
            "sema finished"
        );
        std::mem::take(&mut self.diagnostics)
    }

    fn collect_declared_types(&mut self) {
        self.declared_types.clear();
        for unit in self.units {
            for item in &unit.block().items {
                let ItemKind::Decl(id) = item.kind else {
                    continue;
                };
                match &unit.decl(id).kind {
                    DeclKind::Struct(s) => {
                        self.declared_types.insert(s.name.text.clone());
                    }
                    DeclKind::Enum(e) => {
                        self.declared_types.insert(e.name.text.clone());
                    }
                    _ => {}
                }
            }
        }
    }

    fn pass_through_parse_issues(&mut self, unit: &SourceUnit) {
        for issue in &unit.parse_issues {
            self.report(
                Diagnostic::new(DiagnosticId::SyntaxError)
                    .with_message(issue.message.clone())
                    .with_label(issue.span, ""),
            );
        }
    }

    /// Check every top-level item of a unit in order.
    fn check_unit(&mut self, unit: &'a SourceUnit) {
        for item in &unit.block().items {
            match &item.kind {
                ItemKind::Decl(id) => self.check_top_level_decl(*id),
                ItemKind::Stmt(keyword) => self.report_statement(keyword, item.span),
                ItemKind::Expr(id) => {
                    self.resolve_value_type(*id, None);
                }
                ItemKind::Unrecognized => {
                    self.report(
                        Diagnostic::new(DiagnosticId::UnrecognizedTopLevelSyntax)
                            .with_label(item.span, ""),
                    );
                    // Nothing after this point can be trusted.
                    return;
                }
            }
        }
    }

    /// Check the items of a closure body in the innermost local scope.
    fn check_local_block(&mut self, block: &'a Block) {
        for item in &block.items {
            match &item.kind {
                ItemKind::Decl(id) => self.check_local_decl(*id),
                ItemKind::Stmt(keyword) => self.report_statement(keyword, item.span),
                ItemKind::Expr(id) => {
                    self.resolve_value_type(*id, None);
                }
                ItemKind::Unrecognized => {
                    self.report(
                        Diagnostic::new(DiagnosticId::UnrecognizedTopLevelSyntax)
                            .with_label(item.span, ""),
                    );
                    return;
                }
            }
        }
    }

    fn report_statement(&mut self, keyword: &str, span: zeile_ir::Span) {
        self.report(
            Diagnostic::new(DiagnosticId::UnsupportedStatement)
                .with_args(&[keyword])
                .with_label(span, "statement not allowed here"),
        );
    }

    /// Run `f` with a fresh closure scope, dropping it afterwards.
    fn with_local_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(FxHashMap::default());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn lookup_local(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(String::as_str)
    }

    /// The unit being checked.
    fn unit(&self) -> &'a SourceUnit {
        &self.units[self.current_unit.index()]
    }

    /// Record a diagnostic against the unit being checked.
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic.in_unit(self.current_unit));
    }
}
