//! `Character` and `Position` natives.

use zeile_ir::StepAction;

use super::{character_id, float_arg, position_arg, position_base, string_arg};
use crate::{FunctionArgs, NativeCx, RuntimeObject, Storage, Trivial};

/// `Character(id:)`: the roster supplies the display name.
pub(super) fn init(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let Some(id) = args.arg(0).and_then(RuntimeObject::as_int) else {
        cx.invalid_argument("Character.init", "id is not an Int");
        return None;
    };
    let name = cx.character_name(id);
    Some(
        RuntimeObject::new("Character")
            .with_storage("id", Storage::Trivial(Trivial::Int(id)))
            .with_storage("name", Storage::Trivial(Trivial::String(name))),
    )
}

/// `Position(_:offsetX:)`
pub(super) fn position_init(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let Some(base) = args.arg(0).filter(|base| position_base(base).is_some()) else {
        cx.invalid_argument("Position.init", "base is not a PositionBase");
        return None;
    };
    let base = base.clone();
    let offset_x = float_arg(cx, args, 1, "Position.init")?;
    Some(
        RuntimeObject::new("Position")
            .with_storage("base", Storage::NonTrivial(base))
            .with_storage("offsetX", Storage::Trivial(Trivial::Float(offset_x))),
    )
}

fn show(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs, function: &str) -> Option<RuntimeObject> {
    let character_id = character_id(cx, args.implicit_self.as_ref(), function)?;
    let model_path = string_arg(cx, args, 0, function)?;
    let position = position_arg(cx, args, 1, function)?;
    cx.emit(StepAction::ShowModel {
        character_id,
        model_path,
        position,
    });
    Some(RuntimeObject::void())
}

pub(super) fn show_at_base(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    show(cx, args, "Character.show(model:at:)")
}

pub(super) fn show_at_position(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    show(cx, args, "Character.show(model:at:)")
}

pub(super) fn hide(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let character_id = character_id(cx, args.implicit_self.as_ref(), "Character.hide")?;
    cx.emit(StepAction::HideModel { character_id });
    Some(RuntimeObject::void())
}

fn move_to(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let function = "Character.move(to:)";
    let character_id = character_id(cx, args.implicit_self.as_ref(), function)?;
    let position = position_arg(cx, args, 0, function)?;
    cx.emit(StepAction::MoveModel {
        character_id,
        position,
    });
    Some(RuntimeObject::void())
}

pub(super) fn move_to_base(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    move_to(cx, args)
}

pub(super) fn move_to_position(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    move_to(cx, args)
}

pub(super) fn act(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let character_id = character_id(cx, args.implicit_self.as_ref(), "Character.act")?;
    let motion_name = string_arg(cx, args, 0, "Character.act")?;
    cx.emit(StepAction::Act {
        character_id,
        motion_name,
    });
    Some(RuntimeObject::void())
}

pub(super) fn express(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let character_id = character_id(cx, args.implicit_self.as_ref(), "Character.express")?;
    let expression_name = string_arg(cx, args, 0, "Character.express")?;
    cx.emit(StepAction::Express {
        character_id,
        expression_name,
    });
    Some(RuntimeObject::void())
}
