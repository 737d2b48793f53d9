//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use rustc_hash::FxHashMap;
use zeile_ir::{Span, UnitId};

use crate::span_utils::{line_text, LineOffsetTable};
use crate::{Diagnostic, Label, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const REMARK: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// For `Auto`, `is_tty` decides; it is ignored otherwise.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

struct SourceEntry {
    name: String,
    text: String,
    lines: LineOffsetTable,
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    sources: FxHashMap<UnitId, SourceEntry>,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            sources: FxHashMap::default(),
        }
    }

    /// Register the text of a unit so its diagnostics render with snippets.
    #[must_use]
    pub fn with_source(mut self, unit: UnitId, name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        self.sources.insert(
            unit,
            SourceEntry {
                name: name.into(),
                lines: LineOffsetTable::build(&text),
                text,
            },
        );
        self
    }

    /// Consume the emitter and return its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
            Severity::Remark => colors::REMARK,
        };
        self.write_colored(&severity.to_string(), color);
    }

    fn write_id(&mut self, id: &str) {
        if self.colors {
            let _ = write!(self.writer, "{}[{id}]{}", colors::BOLD, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{id}]");
        }
    }

    /// Write one label, with a snippet when the unit text is registered.
    fn write_label(&mut self, unit: Option<UnitId>, label: &Label) {
        let marker = if label.is_primary { "-->" } else { ":::" };
        let color = if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        };

        let Some(snippet) = unit.and_then(|u| self.snippet(u, label.span)) else {
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
            return;
        };

        let gutter = " ".repeat(snippet.line.to_string().len());
        let _ = writeln!(
            self.writer,
            "{gutter}{marker} {}:{}:{}",
            snippet.name, snippet.line, snippet.col
        );
        let _ = writeln!(self.writer, "{gutter} |");
        let _ = writeln!(self.writer, "{} | {}", snippet.line, snippet.text);
        let _ = write!(
            self.writer,
            "{gutter} | {}",
            " ".repeat(snippet.col.saturating_sub(1) as usize)
        );
        let carets = "^".repeat(snippet.width.max(1));
        self.write_colored(&carets, color);
        if !label.message.is_empty() {
            let _ = write!(self.writer, " ");
            self.write_colored(&label.message, color);
        }
        let _ = writeln!(self.writer);
    }

    fn snippet(&self, unit: UnitId, span: Span) -> Option<Snippet> {
        let entry = self.sources.get(&unit)?;
        let (line, col) = entry.lines.offset_to_line_col(&entry.text, span.start);
        let text = line_text(&entry.text, line)?.to_owned();
        let remaining = text.chars().count().saturating_sub(col as usize - 1);
        let span_chars = entry
            .text
            .get(span.to_range())
            .map_or(0, |s| s.chars().take_while(|c| *c != '\n').count());
        Some(Snippet {
            name: entry.name.clone(),
            line,
            col,
            width: span_chars.min(remaining),
            text,
        })
    }
}

struct Snippet {
    name: String,
    line: u32,
    col: u32,
    width: usize,
    text: String,
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        Self::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: severity[id]: message
        self.write_severity(diagnostic.severity);
        self.write_id(diagnostic.id.as_str());
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(diagnostic.unit, label);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::NOTE);
            let _ = writeln!(self.writer, ": {note}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }
        let mut parts = Vec::new();
        if error_count > 0 {
            parts.push(format!("{error_count} error{}", plural_s(error_count)));
        }
        if warning_count > 0 {
            parts.push(format!("{warning_count} warning{}", plural_s(warning_count)));
        }
        let summary = format!("{} emitted", parts.join(", "));
        let color = if error_count > 0 {
            colors::ERROR
        } else {
            colors::WARNING
        };
        self.write_colored(&summary, color);
        let _ = writeln!(self.writer);
    }
}
