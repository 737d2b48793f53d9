//! The `sample` command: compile a built-in demo scene.
//!
//! There is no parser in the toolchain, so the scene is assembled with
//! [`UnitBuilder`]. Its text is attached for diagnostics and caching.

use std::io::IsTerminal;

use zeile_diagnostic::emitter::{ColorMode, DiagnosticEmitter};
use zeile_diagnostic::Severity;
use zeile_ir::{Item, Locale, SourceUnit, UnitBuilder};

use crate::{BuildOptions, StoryBuilder};

const SAMPLE_TEXT: &str = r#"#!locale=jp
let kasumi = Character(id: 1)
changeBackground("bg/livehouse")
changeBGM("bgm/opening")
kasumi.show("live2d/kasumi", at: .left)
say("Everyone, let's go!", speaker: kasumi)
blocking {
    kasumi.act("jump")
    await delay(seconds: 0.5)
}
telop("Chapter 1")
"#;

/// The demo scene.
pub fn sample_unit() -> SourceUnit {
    let mut b = UnitBuilder::new("sample.zeile")
        .with_text(SAMPLE_TEXT)
        .with_shebang("#!locale=jp");

    let id = b.int(1);
    let init = b.call_named("Character", &[(Some("id"), id)]);
    let kasumi = b.let_decl("kasumi", None, Some(init));
    b.item_decl(kasumi);

    let background = b.string("bg/livehouse");
    let call = b.call_named("changeBackground", &[(None, background)]);
    b.item_expr(call);

    let bgm = b.string("bgm/opening");
    let call = b.call_named("changeBGM", &[(None, bgm)]);
    b.item_expr(call);

    let receiver = b.ident("kasumi");
    let show = b.member(receiver, "show");
    let model = b.string("live2d/kasumi");
    let left = b.implicit_member("left");
    let call = b.call(show, &[(Some("model"), model), (Some("at"), left)]);
    b.item_expr(call);

    let line = b.string("Everyone, let's go!");
    let speaker = b.ident("kasumi");
    let call = b.call_named("say", &[(None, line), (Some("speaker"), speaker)]);
    b.item_expr(call);

    let receiver = b.ident("kasumi");
    let act = b.member(receiver, "act");
    let motion = b.string("jump");
    let jump = b.call(act, &[(None, motion)]);
    let seconds = b.float(0.5);
    let delay = b.call_named("delay", &[(Some("seconds"), seconds)]);
    let pause = b.await_expr(delay);
    let body = b.closure(vec![Item::expr(jump), Item::expr(pause)]);
    let call = b.call_named("blocking", &[(None, body)]);
    b.item_expr(call);

    let chapter = b.string("Chapter 1");
    let call = b.call_named("telop", &[(None, chapter)]);
    b.item_expr(call);

    b.finish()
}

/// Build the demo scene. Writes the container to `output`, or prints the
/// plain-text listing when no output path is given.
pub fn build_sample(output: Option<&str>, locale: Option<Locale>) {
    let mut options = BuildOptions::default();
    if let Some(locale) = locale {
        options = options.with_locale(locale);
    }
    let build = StoryBuilder::new(options).build(vec![sample_unit()]);

    if !build.diagnostics.is_empty() {
        let stderr = std::io::stderr();
        let is_tty = stderr.is_terminal();
        let mut emitter = build.terminal_emitter(stderr, ColorMode::Auto, is_tty);
        emitter.emit_all(&build.diagnostics);
        let warnings = build
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        emitter.emit_summary(build.error_count(), warnings);
        emitter.flush();
    }

    let story = match build.into_story() {
        Ok(story) => story,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let Some(path) = output else {
        print!("{}", story.to_plain_text());
        return;
    };
    let bytes = match zeile_codec::encode(&story) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: failed to encode story: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(path, &bytes) {
        eprintln!("error: cannot write '{path}': {e}");
        std::process::exit(1);
    }
    println!("wrote {} bytes to {path}", bytes.len());
}
