//! Native implementations of the standard library.
//!
//! Each entry is keyed by the mangled name of the declaration in
//! `zeile_sema::stdlib_unit`, so the keys here and the standard library
//! declarations must stay in step.

mod character;
mod staging;

use zeile_ir::{Position, PositionBase};

use crate::{FunctionArgs, NativeCx, RuntimeObject, VTable};

pub(crate) fn register_stdlib(vtable: &mut VTable) {
    // Character
    vtable.register("$zp9Characterf4init2id3IntesrV", character::init);
    vtable.register(
        "$zp9Characterf4show5model6String2at12PositionBaserV",
        character::show_at_base,
    );
    vtable.register(
        "$zp9Characterf4show5model6String2at8PositionrV",
        character::show_at_position,
    );
    vtable.register("$zp9Characterf4hiderV", character::hide);
    vtable.register(
        "$zp9Characterf4move2to12PositionBaserV",
        character::move_to_base,
    );
    vtable.register(
        "$zp9Characterf4move2to8PositionrV",
        character::move_to_position,
    );
    vtable.register("$zp9Characterf3act1_6StringrV", character::act);
    vtable.register("$zp9Characterf7express1_6StringrV", character::express);

    // Position
    vtable.register(
        "$zp8Positionf4init1_12PositionBase7offsetX5FloatesrV",
        character::position_init,
    );

    // Dialogue and staging
    vtable.register("$zf3say1_6StringrV", staging::say);
    vtable.register(
        "$zf3say1_6String7speaker9CharacterrV",
        staging::say_from_speaker,
    );
    vtable.register(
        "$zf3say1_6String7speaker9Character5voice6StringrV",
        staging::say_with_voice,
    );
    vtable.register("$zf5telop1_6StringrV", staging::telop);
    vtable.register(
        "$zf14showBlackCover8duration5FloatrV",
        staging::show_black_cover,
    );
    vtable.register(
        "$zf14hideBlackCover8duration5FloatrV",
        staging::hide_black_cover,
    );
    vtable.register(
        "$zf14showWhiteCover8duration5FloatrV",
        staging::show_white_cover,
    );
    vtable.register(
        "$zf14hideWhiteCover8duration5FloatrV",
        staging::hide_white_cover,
    );
    vtable.register("$zf16changeBackground1_6StringrV", staging::change_background);
    vtable.register("$zf9changeBGM1_6StringrV", staging::change_bgm);
    vtable.register("$zf8changeSE1_6StringrV", staging::change_se);
    vtable.register("$zf8blocking1_7ClosurerV", staging::blocking);
    vtable.register("$zf4fork1_7ClosurerV", staging::fork);
    vtable.register("$zf5delay7seconds5FloateArV", staging::delay);
    vtable.register("$zf10waitForAlleArV", staging::wait_for_all);
}

// -- Argument access --
//
// Each helper reports `NativeArgumentInvalid` when the argument does not
// have the expected shape. Sema makes that unreachable for well-typed
// scripts, so these only fire for custom tables or inconsistent input.

fn string_arg(
    cx: &mut NativeCx<'_, '_>,
    args: &FunctionArgs,
    index: usize,
    function: &str,
) -> Option<String> {
    let value = args.arg(index).and_then(RuntimeObject::as_str);
    if value.is_none() {
        cx.invalid_argument(function, &format!("argument {index} is not a String"));
    }
    value.map(str::to_owned)
}

fn float_arg(
    cx: &mut NativeCx<'_, '_>,
    args: &FunctionArgs,
    index: usize,
    function: &str,
) -> Option<f64> {
    let value = args.arg(index).and_then(RuntimeObject::as_float);
    if value.is_none() {
        cx.invalid_argument(function, &format!("argument {index} is not a Float"));
    }
    value
}

/// ID of a `Character` object.
fn character_id(cx: &mut NativeCx<'_, '_>, character: Option<&RuntimeObject>, function: &str) -> Option<i64> {
    let id = character
        .filter(|c| c.ty == "Character")
        .and_then(|c| c.field("id"))
        .and_then(|id| id.as_int());
    if id.is_none() {
        cx.invalid_argument(function, "expected a Character");
    }
    id
}

fn position_base(object: &RuntimeObject) -> Option<PositionBase> {
    if object.ty != "PositionBase" {
        return None;
    }
    PositionBase::from_case_name(object.case_name()?)
}

/// A `Position` object, or a bare `PositionBase` with no offset.
fn position(object: &RuntimeObject) -> Option<Position> {
    if let Some(base) = position_base(object) {
        return Some(Position::at(base));
    }
    if object.ty != "Position" {
        return None;
    }
    Some(Position {
        base: position_base(&object.field("base")?)?,
        offset_x: object.field("offsetX")?.as_float()?,
    })
}

fn position_arg(
    cx: &mut NativeCx<'_, '_>,
    args: &FunctionArgs,
    index: usize,
    function: &str,
) -> Option<Position> {
    let value = args.arg(index).and_then(position);
    if value.is_none() {
        cx.invalid_argument(function, &format!("argument {index} is not a position"));
    }
    value
}

#[cfg(test)]
mod tests;
