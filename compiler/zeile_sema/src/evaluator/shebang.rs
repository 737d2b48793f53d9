//! The per-unit `#! key = value` header.
//!
//! `locale` is the only key. Problems are warnings and leave the locale at
//! its default.

use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{Locale, SourceUnit};

use super::SemaEvaluator;

const LOCALE_KEY: &str = "locale";

impl SemaEvaluator<'_> {
    pub(super) fn apply_shebang(&mut self, unit: &SourceUnit) {
        let Some(shebang) = &unit.shebang else {
            return;
        };
        let body = shebang.text.strip_prefix("#!").unwrap_or(&shebang.text);
        let Some((key, value)) = body
            .split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        else {
            self.report(Diagnostic::new(DiagnosticId::InvalidShebang).with_label(shebang.span, ""));
            return;
        };

        if key != LOCALE_KEY {
            self.report(
                Diagnostic::new(DiagnosticId::UnknownShebangKey)
                    .with_args(&[key])
                    .with_label(shebang.span, ""),
            );
            return;
        }
        match value.parse::<Locale>() {
            Ok(locale) => self.tables.locale = locale,
            Err(()) => self.report(
                Diagnostic::new(DiagnosticId::UnknownLocale)
                    .with_args(&[value])
                    .with_label(shebang.span, "expected one of jp, en, tw, cn, kr"),
            ),
        }
    }
}
