#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use zeile_ir::{Position, PositionBase};
use zeile_sema::{stdlib_unit, SemaEvaluator, Symbolizer};

use super::position;
use crate::{RuntimeObject, Storage, Trivial, VTable};

#[test]
fn test_every_stdlib_function_has_a_native() {
    let units = vec![stdlib_unit()];
    let mut evaluator = SemaEvaluator::new(&units);
    let diagnostics = evaluator.perform_sema();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let mut symbols = Symbolizer::new(evaluator.tables()).symbolize_all();
    symbols.sort();
    let vtable = VTable::with_stdlib();

    assert_eq!(vtable.keys(), symbols.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_extend_from_replaces_clashes() {
    fn nothing(
        _cx: &mut crate::NativeCx<'_, '_>,
        _args: &crate::FunctionArgs,
    ) -> Option<RuntimeObject> {
        None
    }

    let mut custom = VTable::new();
    custom.register("$zf3say1_6StringrV", nothing);
    custom.register("$zf4talk1_6StringrV", nothing);

    let mut vtable = VTable::with_stdlib();
    let before = vtable.len();
    vtable.extend_from(&custom);

    assert_eq!(vtable.len(), before + 1);
    assert!(vtable.contains("$zf4talk1_6StringrV"));
}

#[test]
fn test_position_from_base_or_struct() {
    let left = RuntimeObject::enum_case("PositionBase", "left");
    assert_eq!(position(&left), Some(Position::at(PositionBase::Left)));

    let shifted = RuntimeObject::new("Position")
        .with_storage(
            "base",
            Storage::NonTrivial(RuntimeObject::enum_case("PositionBase", "rightInside")),
        )
        .with_storage("offsetX", Storage::Trivial(Trivial::Float(-0.5)));
    assert_eq!(
        position(&shifted),
        Some(Position {
            base: PositionBase::RightInside,
            offset_x: -0.5,
        })
    );
}

#[test]
fn test_position_rejects_other_values() {
    assert_eq!(position(&RuntimeObject::int(1)), None);
    assert_eq!(position(&RuntimeObject::enum_case("PositionBase", "nowhere")), None);
    assert_eq!(position(&RuntimeObject::new("Position")), None);
}
