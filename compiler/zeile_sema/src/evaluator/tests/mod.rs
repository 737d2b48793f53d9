//! Tests for the semantic evaluator.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod decl_tests;

use pretty_assertions::assert_eq;
use zeile_diagnostic::{Diagnostic, DiagnosticId, HasError};
use zeile_ir::{SourceUnit, UnitBuilder};

use crate::{stdlib_unit, SemaEvaluator, SemaTables};

/// Check `user` after the standard library.
fn check_unit(user: SourceUnit) -> (SemaTables, Vec<Diagnostic>) {
    check_units(vec![stdlib_unit(), user])
}

fn check_units(units: Vec<SourceUnit>) -> (SemaTables, Vec<Diagnostic>) {
    let mut evaluator = SemaEvaluator::new(&units);
    let diagnostics = evaluator.perform_sema();
    (evaluator.into_tables(), diagnostics)
}

/// Build a user unit with `build` and check it.
fn check(build: impl FnOnce(&mut UnitBuilder)) -> (SemaTables, Vec<Diagnostic>) {
    let mut b = UnitBuilder::new("main.zeile");
    build(&mut b);
    check_unit(b.finish())
}

fn ids(diagnostics: &[Diagnostic]) -> Vec<DiagnosticId> {
    diagnostics.iter().map(|d| d.id).collect()
}

#[test]
fn test_stdlib_alone_is_clean() {
    let (tables, diagnostics) = check_units(vec![stdlib_unit()]);

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    for name in ["Bool", "Int", "Float", "String", "Closure", "Position", "Character"] {
        assert!(tables.structs.contains_key(name), "missing {name}");
    }
    assert_eq!(tables.enums["PositionBase"].cases.len(), 11);
    assert_eq!(tables.structs["Character"].initializers.len(), 1);
    assert_eq!(tables.structs["Character"].instance_methods.len(), 7);
    assert_eq!(tables.top_functions.len(), 15);
}

#[test]
fn test_empty_user_unit_is_clean() {
    let (_, diagnostics) = check(|_| {});
    assert!(!diagnostics.has_error());
}

#[test]
fn test_perform_sema_is_repeatable() {
    let mut b = UnitBuilder::new("main.zeile");
    let hello = b.string("hello");
    let call = b.call_named("say", &[(None, hello)]);
    b.item_expr(call);
    let units = vec![stdlib_unit(), b.finish()];

    let mut evaluator = SemaEvaluator::new(&units);
    let first = evaluator.perform_sema();
    let first_calls = evaluator.tables().calls.len();
    let second = evaluator.perform_sema();

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first_calls, 1);
    assert_eq!(evaluator.tables().calls.len(), 1);
}

#[test]
fn test_diagnostics_carry_their_unit() {
    let (_, diagnostics) = check(|b| {
        let missing = b.ident("nowhere");
        b.item_expr(missing);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::CannotFindInScope]);
    assert_eq!(diagnostics[0].unit, Some(zeile_ir::UnitId::new(1)));
}

#[test]
fn test_parse_issues_pass_through() {
    let unit = UnitBuilder::new("main.zeile")
        .with_parse_issue("expected ')'", zeile_ir::Span::new(3, 4))
        .finish();
    let (_, diagnostics) = check_unit(unit);

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::SyntaxError]);
    assert_eq!(diagnostics[0].message, "expected ')'");
}

#[test]
fn test_statements_rejected() {
    let (_, diagnostics) = check(|b| {
        b.item_stmt("if");
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::UnsupportedStatement]);
    assert_eq!(diagnostics[0].message, "'if' statements are not supported");
}

#[test]
fn test_unrecognized_item_stops_the_unit() {
    let (_, diagnostics) = check(|b| {
        b.item_unrecognized();
        let missing = b.ident("nowhere");
        b.item_expr(missing);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::UnrecognizedTopLevelSyntax]
    );
}
