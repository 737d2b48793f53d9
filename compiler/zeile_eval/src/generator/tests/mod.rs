//! Tests for IR generation.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod staging_tests;

use pretty_assertions::assert_eq;
use zeile_diagnostic::{Diagnostic, HasError};
use zeile_ir::{FunctionDecl, Locale, StepAction, StoryIr, UnitBuilder};
use zeile_sema::{stdlib_unit, SemaEvaluator};

use crate::{
    CharacterRoster, EmptyRoster, FunctionArgs, IrGenerator, NativeCx, RuntimeObject, VTable,
};

/// Result of checking and generating one user unit.
struct Generated {
    story: StoryIr,
    sema: Vec<Diagnostic>,
    diagnostics: Vec<Diagnostic>,
}

fn generate_with(
    vtable: &VTable,
    roster: &dyn CharacterRoster,
    build: impl FnOnce(&mut UnitBuilder),
) -> Generated {
    let mut b = UnitBuilder::new("main.zeile");
    build(&mut b);
    generate_units(vtable, roster, vec![stdlib_unit(), b.finish()])
}

fn generate_units(
    vtable: &VTable,
    roster: &dyn CharacterRoster,
    units: Vec<zeile_ir::SourceUnit>,
) -> Generated {
    let mut evaluator = SemaEvaluator::new(&units);
    let sema = evaluator.perform_sema();
    let tables = evaluator.into_tables();
    let (story, diagnostics) = IrGenerator::new(&units, &tables, vtable, roster).generate();
    Generated {
        story,
        sema,
        diagnostics,
    }
}

/// Generate with the standard natives and no roster; sema must be clean.
fn generate(build: impl FnOnce(&mut UnitBuilder)) -> Generated {
    let generated = generate_with(&VTable::with_stdlib(), &EmptyRoster, build);
    assert!(!generated.sema.has_error(), "{:?}", generated.sema);
    generated
}

fn say_line(text: &str) -> StepAction {
    StepAction::Talk {
        text: text.to_owned(),
        character_ids: vec![],
        character_names: vec![],
        voice_path: None,
    }
}

/// `say("...")` as a top-level item.
fn push_say(b: &mut UnitBuilder, text: &str) {
    let line = b.string(text);
    let call = b.call_named("say", &[(None, line)]);
    b.item_expr(call);
}

fn talk_native(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let text = args.arg(0)?.as_str()?.to_owned();
    cx.emit(StepAction::Talk {
        text,
        character_ids: vec![],
        character_names: vec![],
        voice_path: None,
    });
    Some(RuntimeObject::void())
}

#[test]
fn test_user_function_dispatches_to_custom_native() {
    let mut vtable = VTable::new();
    vtable.register("$zf4talk1_6StringrV", talk_native);

    let generated = generate_with(&vtable, &EmptyRoster, |b| {
        let talk = b.function(FunctionDecl::new("talk").param("_", "String"));
        b.item_decl(talk);
        let hello = b.string("hello");
        let call = b.call_named("talk", &[(None, hello)]);
        b.item_expr(call);
    });

    assert!(generated.sema.is_empty(), "{:?}", generated.sema);
    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story,
        StoryIr::from_parts(Locale::Jp, vec![say_line("hello")])
    );
}

#[test]
fn test_empty_script_generates_empty_story() {
    let generated = generate(|_| {});

    assert!(generated.story.is_empty());
    assert!(generated.diagnostics.is_empty());
}

#[test]
fn test_actions_follow_source_order() {
    let generated = generate(|b| {
        push_say(b, "one");
        push_say(b, "two");
        push_say(b, "three");
    });

    assert_eq!(
        generated.story.actions(),
        &[say_line("one"), say_line("two"), say_line("three")]
    );
}

#[test]
fn test_units_run_in_order_and_share_top_level_values() {
    let mut first = UnitBuilder::new("first.zeile");
    let greeting = first.string("hi from first");
    let decl = first.let_decl("greeting", None, Some(greeting));
    first.item_decl(decl);

    let mut second = UnitBuilder::new("second.zeile");
    let value = second.ident("greeting");
    let call = second.call_named("say", &[(None, value)]);
    second.item_expr(call);

    let generated = generate_units(
        &VTable::with_stdlib(),
        &EmptyRoster,
        vec![stdlib_unit(), first.finish(), second.finish()],
    );

    assert!(generated.sema.is_empty(), "{:?}", generated.sema);
    assert_eq!(generated.story.actions(), &[say_line("hi from first")]);
}

#[test]
fn test_shebang_selects_story_locale() {
    let mut b = UnitBuilder::new("main.zeile").with_shebang("#! locale = en");
    let line = b.string("hello");
    let call = b.call_named("say", &[(None, line)]);
    b.item_expr(call);

    let generated = generate_units(
        &VTable::with_stdlib(),
        &EmptyRoster,
        vec![stdlib_unit(), b.finish()],
    );

    assert_eq!(generated.story.locale(), Locale::En);
}

#[test]
fn test_locale_override_wins_over_shebang() {
    let mut b = UnitBuilder::new("main.zeile").with_shebang("#! locale = en");
    push_say(&mut b, "hello");
    let units = vec![stdlib_unit(), b.finish()];

    let mut evaluator = SemaEvaluator::new(&units);
    evaluator.perform_sema();
    let tables = evaluator.into_tables();
    let vtable = VTable::with_stdlib();
    let (story, _) = IrGenerator::new(&units, &tables, &vtable, &EmptyRoster)
        .with_locale(Locale::Kr)
        .generate();

    assert_eq!(story.locale(), Locale::Kr);
    assert_eq!(story.actions(), &[say_line("hello")]);
}

#[test]
fn test_interpolation_uses_runtime_values() {
    let generated = generate(|b| {
        let count = b.int(3);
        let decl = b.let_decl("count", None, Some(count));
        b.item_decl(decl);

        let ratio = b.float(0.5);
        let count_ref = b.ident("count");
        let line = b.interpolated(vec![
            zeile_ir::StrSegment::Text("count=".to_owned()),
            zeile_ir::StrSegment::Interpolation(count_ref),
            zeile_ir::StrSegment::Text(" ratio=".to_owned()),
            zeile_ir::StrSegment::Interpolation(ratio),
        ]);
        let call = b.call_named("say", &[(None, line)]);
        b.item_expr(call);
    });

    assert_eq!(generated.story.actions(), &[say_line("count=3 ratio=0.5")]);
}

#[test]
fn test_operators_fold_with_precedence() {
    let generated = generate(|b| {
        // "a" + "b" is String; 1 + 2 * 3 == 7 is Bool.
        let one = b.int(1);
        let two = b.int(2);
        let three = b.int(3);
        let seven = b.int(7);
        let check = b.sequence(vec![one, two, three, seven], &["+", "*", "=="]);
        let decl = b.let_decl("ok", None, Some(check));
        b.item_decl(decl);

        let a = b.string("a");
        let bee = b.string("b");
        let joined = b.sequence(vec![a, bee], &["+"]);
        let ok = b.ident("ok");
        let line = b.interpolated(vec![
            zeile_ir::StrSegment::Interpolation(joined),
            zeile_ir::StrSegment::Text(" ".to_owned()),
            zeile_ir::StrSegment::Interpolation(ok),
        ]);
        let call = b.call_named("say", &[(None, line)]);
        b.item_expr(call);
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(generated.story.actions(), &[say_line("ab true")]);
}

#[test]
fn test_logical_operators_short_circuit() {
    let generated = generate(|b| {
        // false && (1 / 0 == 0) never divides.
        let no = b.bool(false);
        let one = b.int(1);
        let zero = b.int(0);
        let zero_again = b.int(0);
        let division = b.sequence(vec![one, zero, zero_again], &["/", "=="]);
        let both = b.sequence(vec![no, division], &["&&"]);
        let line = b.interpolated(vec![zeile_ir::StrSegment::Interpolation(both)]);
        let call = b.call_named("say", &[(None, line)]);
        b.item_expr(call);
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(generated.story.actions(), &[say_line("false")]);
}
