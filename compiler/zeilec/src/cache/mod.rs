//! Cache of the last semantic analysis.
//!
//! Owned by the host, never global. An entry is keyed by a [`Fingerprint`]
//! of the user sources: total line count and byte length. The key is cheap
//! and coarse; an edit that keeps both numbers reuses the stale entry.
//! Units without source text cannot be fingerprinted and are never cached.

use parking_lot::Mutex;
use zeile_diagnostic::Diagnostic;
use zeile_ir::SourceUnit;
use zeile_sema::SemaTables;

/// Cheap identity of a set of user sources.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Fingerprint {
    pub lines: usize,
    pub bytes: usize,
}

impl Fingerprint {
    /// Fingerprint of `units`, or `None` if any unit lacks source text.
    pub fn of(units: &[SourceUnit]) -> Option<Self> {
        let mut fingerprint = Fingerprint { lines: 0, bytes: 0 };
        for unit in units {
            let text = unit.text.as_deref()?;
            fingerprint.lines += unit.line_count();
            fingerprint.bytes += text.len();
        }
        Some(fingerprint)
    }
}

/// One analysis result together with its symbol universe.
#[derive(Clone, Debug)]
pub struct CachedSema {
    pub fingerprint: Fingerprint,
    pub tables: SemaTables,
    pub diagnostics: Vec<Diagnostic>,
    /// Mangled names of every declared function.
    pub symbols: Vec<String>,
}

/// Holds at most one [`CachedSema`]. Reads hand out clones.
#[derive(Default)]
pub struct CompileCache {
    last: Mutex<Option<CachedSema>>,
}

impl CompileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached entry, if its fingerprint matches.
    pub fn lookup(&self, fingerprint: Fingerprint) -> Option<CachedSema> {
        self.last
            .lock()
            .as_ref()
            .filter(|entry| entry.fingerprint == fingerprint)
            .cloned()
    }

    /// Replace the cached entry.
    pub fn store(&self, entry: CachedSema) {
        *self.last.lock() = Some(entry);
    }

    /// Symbol universe of the cached entry; empty when nothing is cached.
    pub fn symbols(&self) -> Vec<String> {
        self.last
            .lock()
            .as_ref()
            .map(|entry| entry.symbols.clone())
            .unwrap_or_default()
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.last.lock().as_ref().map(|entry| entry.fingerprint)
    }

    pub fn clear(&self) {
        *self.last.lock() = None;
    }
}
