use pretty_assertions::assert_eq;
use zeile_ir::{Span, UnitId};

use super::*;
use crate::{messages, Diagnostic, DiagnosticId};

fn render(emitter: TerminalEmitter<Vec<u8>>, diags: &[Diagnostic]) -> String {
    let mut emitter = emitter;
    emitter.emit_all(diags);
    emitter.flush();
    String::from_utf8(emitter.into_inner()).unwrap_or_default()
}

#[test]
fn test_color_mode() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn test_emit_with_snippet() {
    let source = "struct Foo {}\nstruct Foo {}\n";
    let unit = UnitId::new(1);
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
        .with_source(unit, "main.zeile", source);
    let diag = messages::invalid_redeclaration(Span::new(21, 24), "Foo").in_unit(unit);

    let output = render(emitter, &[diag]);
    let expected = "error[invalid_redeclaration]: invalid redeclaration of 'Foo'\n \
                    --> main.zeile:2:8\n  |\n2 | struct Foo {}\n  |        ^^^ redeclared here\n\n";
    assert_eq!(output, expected);
}

#[test]
fn test_emit_without_source_falls_back_to_span() {
    let diag = messages::cannot_find_in_scope(Span::new(4, 9), "alice")
        .in_unit(UnitId::new(3))
        .with_note("declare it with 'let'");
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);

    let output = render(emitter, &[diag]);
    assert!(output.starts_with("error[cannot_find_in_scope]: cannot find 'alice' in scope\n"));
    assert!(output.contains("  --> 4..9: not found in this scope\n"));
    assert!(output.contains("  = note: declare it with 'let'\n"));
}

#[test]
fn test_caret_stops_at_line_end() {
    let source = "say(\"a\nb\")";
    let unit = UnitId::new(1);
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
        .with_source(unit, "multi.zeile", source);
    let diag = Diagnostic::new(DiagnosticId::SyntaxError)
        .with_message("unterminated string")
        .with_label(Span::new(4, 10), "")
        .in_unit(unit);

    let output = render(emitter, &[diag]);
    assert!(output.contains("1 | say(\"a\n  |     ^^\n"));
}

#[test]
fn test_colors_wrap_severity() {
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    let diag = Diagnostic::new(DiagnosticId::MissingNativeImplementation);
    let output = render(emitter, &[diag]);
    assert!(output.starts_with("\x1b[1;32mremark\x1b[0m"));
}

#[test]
fn test_summary() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(0, 0);
    emitter.emit_summary(1, 0);
    emitter.emit_summary(2, 3);
    emitter.emit_summary(0, 1);
    let output = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    assert_eq!(
        output,
        "1 error emitted\n2 errors, 3 warnings emitted\n1 warning emitted\n"
    );
}
