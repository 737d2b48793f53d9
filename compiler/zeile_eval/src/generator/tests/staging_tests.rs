//! Tests for the standard staging natives driven through scripts.

use pretty_assertions::assert_eq;
use zeile_ir::{
    Binding, Decl, DeclKind, ExprId, Ident, Item, Locale, Pattern, Position, PositionBase, Span,
    StepAction, TypeSyntax, UnitBuilder, VariableDecl,
};

use super::{generate, generate_with, push_say, say_line};
use crate::{MapRoster, VTable};

/// `let <name> = Character(id: <id>)`
fn push_character(b: &mut UnitBuilder, name: &str, id: i64) {
    let id = b.int(id);
    let init = b.call_named("Character", &[(Some("id"), id)]);
    let decl = b.let_decl(name, None, Some(init));
    b.item_decl(decl);
}

/// `<receiver>.<method>(args)` as a top-level item.
fn push_method_call(
    b: &mut UnitBuilder,
    receiver: &str,
    method: &str,
    args: &[(Option<&str>, ExprId)],
) {
    let receiver = b.ident(receiver);
    let callee = b.member(receiver, method);
    let call = b.call(callee, args);
    b.item_expr(call);
}

fn closure_say(b: &mut UnitBuilder, text: &str) -> Item {
    let line = b.string(text);
    let call = b.call_named("say", &[(None, line)]);
    Item::expr(call)
}

#[test]
fn test_say_with_speaker_uses_roster_name() {
    let roster = MapRoster::new()
        .with_name(1, Locale::Jp, "戸山 香澄")
        .with_name(1, Locale::En, "Kasumi Toyama");

    let generated = generate_with(&VTable::with_stdlib(), &roster, |b| {
        push_character(b, "kasumi", 1);
        let line = b.string("Let's go!");
        let speaker = b.ident("kasumi");
        let call = b.call_named("say", &[(None, line), (Some("speaker"), speaker)]);
        b.item_expr(call);
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[StepAction::Talk {
            text: "Let's go!".to_owned(),
            character_ids: vec![1],
            character_names: vec!["戸山香澄".to_owned()],
            voice_path: None,
        }]
    );
}

#[test]
fn test_say_with_voice() {
    let generated = generate(|b| {
        push_character(b, "arisa", 2);
        let line = b.string("...");
        let speaker = b.ident("arisa");
        let voice = b.string("voice/arisa_01");
        let call = b.call_named(
            "say",
            &[(None, line), (Some("speaker"), speaker), (Some("voice"), voice)],
        );
        b.item_expr(call);
    });

    assert_eq!(
        generated.story.actions(),
        &[StepAction::Talk {
            text: "...".to_owned(),
            character_ids: vec![2],
            // The empty roster knows no names.
            character_names: vec![String::new()],
            voice_path: Some("voice/arisa_01".to_owned()),
        }]
    );
}

#[test]
fn test_model_staging_on_a_character() {
    let generated = generate(|b| {
        push_character(b, "hero", 7);

        let model = b.string("models/hero");
        let left = b.implicit_member("left");
        push_method_call(b, "hero", "show", &[(Some("model"), model), (Some("at"), left)]);

        let base = b.implicit_member("right");
        let offset = b.float(0.25);
        let position = b.call_named("Position", &[(None, base), (Some("offsetX"), offset)]);
        push_method_call(b, "hero", "move", &[(Some("to"), position)]);

        let motion = b.string("wave");
        push_method_call(b, "hero", "act", &[(None, motion)]);
        let face = b.string("smile");
        push_method_call(b, "hero", "express", &[(None, face)]);
        push_method_call(b, "hero", "hide", &[]);
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[
            StepAction::ShowModel {
                character_id: 7,
                model_path: "models/hero".to_owned(),
                position: Position::at(PositionBase::Left),
            },
            StepAction::MoveModel {
                character_id: 7,
                position: Position {
                    base: PositionBase::Right,
                    offset_x: 0.25,
                },
            },
            StepAction::Act {
                character_id: 7,
                motion_name: "wave".to_owned(),
            },
            StepAction::Express {
                character_id: 7,
                expression_name: "smile".to_owned(),
            },
            StepAction::HideModel { character_id: 7 },
        ]
    );
}

#[test]
fn test_screen_and_audio_natives() {
    let generated = generate(|b| {
        for (name, label, value) in [
            ("showBlackCover", "duration", 1.0),
            ("hideWhiteCover", "duration", 0.5),
        ] {
            let duration = b.float(value);
            let call = b.call_named(name, &[(Some(label), duration)]);
            b.item_expr(call);
        }
        for (name, path) in [
            ("changeBackground", "bg/school"),
            ("changeBGM", "bgm/theme"),
            ("changeSE", "se/door"),
            ("telop", "The next day"),
        ] {
            let path = b.string(path);
            let call = b.call_named(name, &[(None, path)]);
            b.item_expr(call);
        }
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[
            StepAction::ShowBlackCover { duration: 1.0 },
            StepAction::HideWhiteCover { duration: 0.5 },
            StepAction::ChangeBackground {
                path: "bg/school".to_owned()
            },
            StepAction::ChangeBgm {
                path: "bgm/theme".to_owned()
            },
            StepAction::ChangeSe {
                path: "se/door".to_owned()
            },
            StepAction::Telop {
                text: "The next day".to_owned()
            },
        ]
    );
}

#[test]
fn test_blocking_and_fork_capture_nested_actions() {
    let generated = generate(|b| {
        let inner = closure_say(b, "inside fork");
        let fork_body = b.closure(vec![inner]);
        let fork = b.call_named("fork", &[(None, fork_body)]);

        let first = closure_say(b, "inside blocking");
        let blocking_body = b.closure(vec![first, Item::expr(fork)]);
        let blocking = b.call_named("blocking", &[(None, blocking_body)]);
        b.item_expr(blocking);

        let seconds = b.float(2.0);
        let delay = b.call_named("delay", &[(Some("seconds"), seconds)]);
        let awaited = b.await_expr(delay);
        b.item_expr(awaited);

        let wait = b.call_named("waitForAll", &[]);
        let awaited = b.await_expr(wait);
        b.item_expr(awaited);
        push_say(b, "after");
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[
            StepAction::Blocking(vec![
                say_line("inside blocking"),
                StepAction::ForkTask(vec![say_line("inside fork")]),
            ]),
            StepAction::Delay { seconds: 2.0 },
            StepAction::WaitForAll,
            say_line("after"),
        ]
    );
}

#[test]
fn test_closure_sees_bindings_made_before_it() {
    let generated = generate(|b| {
        let text = b.string("captured");
        let decl = b.let_decl("line", None, Some(text));
        b.item_decl(decl);

        let value = b.ident("line");
        let call = b.call_named("say", &[(None, value)]);
        let local = b.string("local");
        let local_decl = b.let_decl("inner", None, Some(local));
        let inner_ref = b.ident("inner");
        let inner_call = b.call_named("say", &[(None, inner_ref)]);
        let body = b.closure(vec![Item::expr(call), Item::decl(local_decl), Item::expr(inner_call)]);
        let blocking = b.call_named("blocking", &[(None, body)]);
        b.item_expr(blocking);
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[StepAction::Blocking(vec![
            say_line("captured"),
            say_line("local"),
        ])]
    );
}

#[test]
fn test_static_variable_initializer_runs_on_demand() {
    let generated = generate(|b| {
        // struct Cast { static let lead: Character = Character(id: 3) }
        let id = b.int(3);
        let init = b.call_named("Character", &[(Some("id"), id)]);
        let lead = b.push_decl(
            Decl::new(DeclKind::Variable(VariableDecl {
                specifier: Ident::synthetic("let"),
                bindings: vec![Binding {
                    pattern: Pattern::Identifier(Ident::synthetic("lead")),
                    annotation: Some(TypeSyntax::named("Character")),
                    initializer: Some(init),
                    span: Span::DUMMY,
                }],
            }))
            .with_modifier("static"),
        );
        let cast = b.struct_decl("Cast", vec![lead]);
        b.item_decl(cast);

        for _ in 0..2 {
            let cast_ref = b.ident("Cast");
            let lead_ref = b.member(cast_ref, "lead");
            let callee = b.member(lead_ref, "hide");
            let call = b.call(callee, &[]);
            b.item_expr(call);
        }
    });

    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    assert_eq!(
        generated.story.actions(),
        &[
            StepAction::HideModel { character_id: 3 },
            StepAction::HideModel { character_id: 3 },
        ]
    );
}
