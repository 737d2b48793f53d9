//! Mangled-name universe of a checked script.

use zeile_ir::mangle;

use crate::SemaTables;

/// Lists the mangled name of every declared function.
pub struct Symbolizer<'a> {
    tables: &'a SemaTables,
}

impl<'a> Symbolizer<'a> {
    pub fn new(tables: &'a SemaTables) -> Self {
        Symbolizer { tables }
    }

    /// Struct members first (structs sorted by name; static methods,
    /// instance methods, then initializers), then top-level functions in
    /// declaration order.
    pub fn symbolize_all(&self) -> Vec<String> {
        let mut names: Vec<&String> = self.tables.structs.keys().collect();
        names.sort();

        let mut result = Vec::new();
        for name in names {
            let Some(resolved) = self.tables.structs.get(name) else {
                continue;
            };
            for f in &resolved.static_methods {
                result.push(mangle(f, Some(name), true));
            }
            for m in &resolved.instance_methods {
                result.push(mangle(m, Some(name), false));
            }
            for i in &resolved.initializers {
                result.push(mangle(i, Some(name), true));
            }
        }
        for f in &self.tables.top_functions {
            result.push(mangle(f, None, false));
        }
        result
    }
}
