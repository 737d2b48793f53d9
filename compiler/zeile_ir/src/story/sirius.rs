//! Indented outline of a story IR, one line per action.
//!
//! ```text
//! # LOCALE: JP
//!
//! 0 Talk (Hello!, charID: [1], charName: ["Kasumi"], voicePath: nil)
//! 1 Blocking {
//!   0 Delay (seconds: 1.5)
//! }
//! 2 WaitForAll
//!
//! EOF.
//! ```
//!
//! Actions are numbered within their own list and nested lists are
//! indented two spaces per level. Fields are written in key order; the
//! unnamed field (dialogue text) comes first. Line breaks inside texts are
//! written as `\n`.

use std::fmt::Write;

use super::{Position, StepAction, StoryIr};

/// Render the outline for `ir`.
pub fn to_sirius(ir: &StoryIr) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# LOCALE: {}", ir.locale().as_str().to_uppercase());
    out.push('\n');
    write_actions(&mut out, ir.actions(), 0);
    out.push_str("\nEOF.");
    out
}

fn write_actions(out: &mut String, actions: &[StepAction], depth: usize) {
    for (index, action) in actions.iter().enumerate() {
        let _ = write!(out, "{}{index} ", indent(depth));
        write_action(out, action, depth);
        out.push('\n');
    }
}

fn write_action(out: &mut String, action: &StepAction, depth: usize) {
    match action {
        StepAction::Talk {
            text,
            character_ids,
            character_names,
            voice_path,
        } => fields(
            out,
            "Talk",
            &[
                ("", escape(text)),
                ("charID", format!("{character_ids:?}")),
                ("charName", format!("{character_names:?}")),
                ("voicePath", voice_path.clone().unwrap_or_else(|| "nil".to_owned())),
            ],
        ),
        StepAction::Telop { text } => fields(out, "Telop", &[("", escape(text))]),
        StepAction::ShowModel {
            character_id,
            model_path,
            position,
        } => fields(
            out,
            "ShowModel",
            &[
                ("charID", character_id.to_string()),
                ("modelPath", model_path.clone()),
                ("position", position_text(*position)),
            ],
        ),
        StepAction::HideModel { character_id } => {
            fields(out, "HideModel", &[("charID", character_id.to_string())]);
        }
        StepAction::MoveModel {
            character_id,
            position,
        } => fields(
            out,
            "MoveModel",
            &[
                ("charID", character_id.to_string()),
                ("position", position_text(*position)),
            ],
        ),
        StepAction::Act {
            character_id,
            motion_name,
        } => fields(
            out,
            "Act",
            &[
                ("charID", character_id.to_string()),
                ("motionName", motion_name.clone()),
            ],
        ),
        StepAction::Express {
            character_id,
            expression_name,
        } => fields(
            out,
            "Express",
            &[
                ("charID", character_id.to_string()),
                ("expressionName", expression_name.clone()),
            ],
        ),
        StepAction::ShowBlackCover { duration } => duration_field(out, "ShowBlackCover", *duration),
        StepAction::HideBlackCover { duration } => duration_field(out, "HideBlackCover", *duration),
        StepAction::ShowWhiteCover { duration } => duration_field(out, "ShowWhiteCover", *duration),
        StepAction::HideWhiteCover { duration } => duration_field(out, "HideWhiteCover", *duration),
        StepAction::ChangeBackground { path } => {
            fields(out, "ChangeBackground", &[("path", path.clone())]);
        }
        StepAction::ChangeBgm { path } => fields(out, "ChangeBGM", &[("path", path.clone())]),
        StepAction::ChangeSe { path } => fields(out, "ChangeSE", &[("path", path.clone())]),
        StepAction::Blocking(actions) => closure(out, "Blocking", actions, depth),
        StepAction::Delay { seconds } => fields(out, "Delay", &[("seconds", format!("{seconds:?}"))]),
        StepAction::ForkTask(actions) => closure(out, "ForkTask", actions, depth),
        StepAction::WaitForAll => out.push_str("WaitForAll"),
    }
}

/// `Name (value, key: value, ...)`; an empty key writes the bare value.
fn fields(out: &mut String, name: &str, fields: &[(&str, String)]) {
    out.push_str(name);
    out.push_str(" (");
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if !key.is_empty() {
            let _ = write!(out, "{key}: ");
        }
        out.push_str(value);
    }
    out.push(')');
}

fn duration_field(out: &mut String, name: &str, duration: f64) {
    fields(out, name, &[("duration", format!("{duration:?}"))]);
}

fn closure(out: &mut String, name: &str, actions: &[StepAction], depth: usize) {
    out.push_str(name);
    if actions.is_empty() {
        out.push_str(" {}");
        return;
    }
    out.push_str(" {\n");
    write_actions(out, actions, depth + 1);
    let _ = write!(out, "{}}}", indent(depth));
}

fn position_text(position: Position) -> String {
    format!(
        "Position(base: {}, offsetX: {:?})",
        position.base.case_name(),
        position.offset_x
    )
}

fn escape(text: &str) -> String {
    text.replace('\n', "\\n")
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
