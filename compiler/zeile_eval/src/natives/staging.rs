//! Dialogue, screen, audio and flow natives.

use zeile_ir::StepAction;

use super::{character_id, float_arg, string_arg};
use crate::{FunctionArgs, NativeCx, RuntimeObject};

fn talk(
    cx: &mut NativeCx<'_, '_>,
    args: &FunctionArgs,
    function: &str,
    with_speaker: bool,
    with_voice: bool,
) -> Option<RuntimeObject> {
    let text = string_arg(cx, args, 0, function)?;
    let (character_ids, character_names) = if with_speaker {
        let speaker = args.arg(1);
        let id = character_id(cx, speaker, function)?;
        let name = speaker
            .and_then(|s| s.field("name"))
            .and_then(|name| name.as_str().map(str::to_owned))
            .unwrap_or_default();
        (vec![id], vec![name])
    } else {
        (Vec::new(), Vec::new())
    };
    let voice_path = if with_voice {
        Some(string_arg(cx, args, 2, function)?)
    } else {
        None
    };
    cx.emit(StepAction::Talk {
        text,
        character_ids,
        character_names,
        voice_path,
    });
    Some(RuntimeObject::void())
}

pub(super) fn say(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    talk(cx, args, "say(_:)", false, false)
}

pub(super) fn say_from_speaker(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    talk(cx, args, "say(_:speaker:)", true, false)
}

pub(super) fn say_with_voice(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    talk(cx, args, "say(_:speaker:voice:)", true, true)
}

pub(super) fn telop(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let text = string_arg(cx, args, 0, "telop")?;
    cx.emit(StepAction::Telop { text });
    Some(RuntimeObject::void())
}

macro_rules! duration_natives {
    ($($name:ident => $variant:ident,)*) => {
        $(
            pub(super) fn $name(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
                let duration = float_arg(cx, args, 0, stringify!($variant))?;
                cx.emit(StepAction::$variant { duration });
                Some(RuntimeObject::void())
            }
        )*
    };
}

duration_natives! {
    show_black_cover => ShowBlackCover,
    hide_black_cover => HideBlackCover,
    show_white_cover => ShowWhiteCover,
    hide_white_cover => HideWhiteCover,
}

macro_rules! path_natives {
    ($($name:ident => $variant:ident,)*) => {
        $(
            pub(super) fn $name(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
                let path = string_arg(cx, args, 0, stringify!($variant))?;
                cx.emit(StepAction::$variant { path });
                Some(RuntimeObject::void())
            }
        )*
    };
}

path_natives! {
    change_background => ChangeBackground,
    change_bgm => ChangeBgm,
    change_se => ChangeSe,
}

fn captured(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs, function: &str) -> Option<Vec<StepAction>> {
    let closure = args.arg(0).filter(|c| c.ty == "Closure");
    let actions = closure.and_then(|c| cx.capture(c));
    if actions.is_none() {
        cx.invalid_argument(function, "argument is not a closure");
    }
    actions
}

/// `blocking { ... }`: the renderer finishes these before moving on.
pub(super) fn blocking(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let actions = captured(cx, args, "blocking")?;
    cx.emit(StepAction::Blocking(actions));
    Some(RuntimeObject::void())
}

/// `fork { ... }`: runs alongside what follows until `waitForAll`.
pub(super) fn fork(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let actions = captured(cx, args, "fork")?;
    cx.emit(StepAction::ForkTask(actions));
    Some(RuntimeObject::void())
}

pub(super) fn delay(cx: &mut NativeCx<'_, '_>, args: &FunctionArgs) -> Option<RuntimeObject> {
    let seconds = float_arg(cx, args, 0, "delay")?;
    cx.emit(StepAction::Delay { seconds });
    Some(RuntimeObject::void())
}

pub(super) fn wait_for_all(cx: &mut NativeCx<'_, '_>, _args: &FunctionArgs) -> Option<RuntimeObject> {
    cx.emit(StepAction::WaitForAll);
    Some(RuntimeObject::void())
}
