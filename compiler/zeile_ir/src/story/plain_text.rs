//! Plain-text listing of a story IR.
//!
//! ```text
//! .text
//! t0: Hello\; world;
//!
//! .path
//! p0: bg/school;
//!
//! .code
//! cbg    p0
//! tlk    t0, [#1], [t1]
//! blk    $sub_0
//!
//! sub_0:
//! slp    #1.5
//! ```
//!
//! Texts and paths are pooled in first-use order and referenced as `tN` and
//! `pN`; a `;` inside a pooled string is written as `\;`. Numbers carry a
//! `#` prefix and positions render as `{#base, #offset}`. Nested action
//! lists become `sub_N` sections, numbered in the order they finish.
//!
//! Mnemonics: `tlk` talk, `tlp` telop, `mds`/`mdh`/`mdm` show/hide/move
//! model, `act`, `exp` express, `bcs`/`bch` and `wcs`/`wch` black and white
//! covers, `cbg` background, `cbm` BGM, `cse` sound effect, `blk` blocking,
//! `slp` delay, `tsk` fork task, `wfa` wait for all.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use super::{Position, StepAction, StoryIr};

/// Render the listing for `ir`.
pub fn to_plain_text(ir: &StoryIr) -> String {
    let mut texts = Pool::default();
    let mut paths = Pool::default();
    collect_strings(ir.actions(), &mut texts, &mut paths);

    let mut out = String::new();
    out.push_str(".text\n");
    texts.write_table(&mut out, 't');
    out.push('\n');

    out.push_str(".path\n");
    paths.write_table(&mut out, 'p');
    out.push('\n');

    let mut listing = Listing {
        texts: &texts,
        paths: &paths,
        subs: Vec::new(),
    };
    let code = listing.render(ir.actions());

    out.push_str(".code\n");
    out.push_str(&code);
    out.push('\n');

    let subs: Vec<String> = listing
        .subs
        .iter()
        .enumerate()
        .map(|(i, body)| format!("sub_{i}:\n{body}"))
        .collect();
    out.push_str(&subs.join("\n"));
    out
}

/// Deduplicated strings in first-use order.
#[derive(Default)]
struct Pool<'a> {
    entries: Vec<&'a str>,
    index: FxHashMap<&'a str, usize>,
}

impl<'a> Pool<'a> {
    fn add(&mut self, s: &'a str) {
        if !self.index.contains_key(s) {
            self.index.insert(s, self.entries.len());
            self.entries.push(s);
        }
    }

    fn get(&self, s: &str) -> usize {
        self.index.get(s).copied().unwrap_or_default()
    }

    fn write_table(&self, out: &mut String, prefix: char) {
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(out, "{prefix}{i}: {};", entry.replace(';', "\\;"));
        }
    }
}

fn collect_strings<'a>(actions: &'a [StepAction], texts: &mut Pool<'a>, paths: &mut Pool<'a>) {
    for action in actions {
        match action {
            StepAction::Talk {
                text,
                character_names,
                voice_path,
                ..
            } => {
                texts.add(text);
                for name in character_names {
                    texts.add(name);
                }
                if let Some(voice) = voice_path {
                    paths.add(voice);
                }
            }
            StepAction::Telop { text } => texts.add(text),
            StepAction::ShowModel { model_path, .. } => paths.add(model_path),
            StepAction::Act { motion_name, .. } => texts.add(motion_name),
            StepAction::Express {
                expression_name, ..
            } => texts.add(expression_name),
            StepAction::ChangeBackground { path }
            | StepAction::ChangeBgm { path }
            | StepAction::ChangeSe { path } => paths.add(path),
            StepAction::Blocking(nested) | StepAction::ForkTask(nested) => {
                collect_strings(nested, texts, paths);
            }
            _ => {}
        }
    }
}

struct Listing<'p, 'a> {
    texts: &'p Pool<'a>,
    paths: &'p Pool<'a>,
    subs: Vec<String>,
}

impl Listing<'_, '_> {
    fn render(&mut self, actions: &[StepAction]) -> String {
        let mut out = String::new();
        for action in actions {
            let line = match action {
                StepAction::Talk {
                    text,
                    character_ids,
                    character_names,
                    voice_path,
                } => {
                    let ids: Vec<String> = character_ids.iter().map(|id| format!("#{id}")).collect();
                    let names: Vec<String> = character_names
                        .iter()
                        .map(|name| format!("t{}", self.texts.get(name)))
                        .collect();
                    let mut line = format!(
                        "tlk    t{}, [{}], [{}]",
                        self.texts.get(text),
                        ids.join(", "),
                        names.join(", ")
                    );
                    if let Some(voice) = voice_path {
                        let _ = write!(line, ", p{}", self.paths.get(voice));
                    }
                    line
                }
                StepAction::Telop { text } => format!("tlp    t{}", self.texts.get(text)),
                StepAction::ShowModel {
                    character_id,
                    model_path,
                    position,
                } => format!(
                    "mds    #{character_id}, p{}, {}",
                    self.paths.get(model_path),
                    position_text(*position)
                ),
                StepAction::HideModel { character_id } => format!("mdh    #{character_id}"),
                StepAction::MoveModel {
                    character_id,
                    position,
                } => format!("mdm    #{character_id}, {}", position_text(*position)),
                StepAction::Act {
                    character_id,
                    motion_name,
                } => format!("act    #{character_id}, t{}", self.texts.get(motion_name)),
                StepAction::Express {
                    character_id,
                    expression_name,
                } => format!(
                    "exp    #{character_id}, t{}",
                    self.texts.get(expression_name)
                ),
                StepAction::ShowBlackCover { duration } => format!("bcs    #{duration:?}"),
                StepAction::HideBlackCover { duration } => format!("bch    #{duration:?}"),
                StepAction::ShowWhiteCover { duration } => format!("wcs    #{duration:?}"),
                StepAction::HideWhiteCover { duration } => format!("wch    #{duration:?}"),
                StepAction::ChangeBackground { path } => {
                    format!("cbg    p{}", self.paths.get(path))
                }
                StepAction::ChangeBgm { path } => format!("cbm    p{}", self.paths.get(path)),
                StepAction::ChangeSe { path } => format!("cse    p{}", self.paths.get(path)),
                StepAction::Blocking(nested) => format!("blk    $sub_{}", self.sub(nested)),
                StepAction::Delay { seconds } => format!("slp    #{seconds:?}"),
                StepAction::ForkTask(nested) => format!("tsk    $sub_{}", self.sub(nested)),
                StepAction::WaitForAll => "wfa".to_owned(),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Render a nested list into its own section and return its number.
    fn sub(&mut self, actions: &[StepAction]) -> usize {
        let body = self.render(actions);
        self.subs.push(body);
        self.subs.len() - 1
    }
}

fn position_text(position: Position) -> String {
    format!("{{#{}, #{:?}}}", position.base.index(), position.offset_x)
}
