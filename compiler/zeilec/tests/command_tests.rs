//! Tests for the rendering behind the `zeile` commands.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use zeile_codec::CodecError;
use zeile_ir::{demangle, Locale, StepAction, StoryIr};
use zeilec::commands::{
    demangled_text, explanation, render_container, render_container_as, stdlib_symbols,
    InspectFormat,
};

#[test]
fn test_demangle_known_symbol() {
    let symbol = "$zf3say1_6String7speaker9CharacterrV";
    assert_eq!(
        demangled_text(symbol),
        demangle(symbol).unwrap().to_string()
    );
    assert_ne!(demangled_text(symbol), symbol);
}

#[test]
fn test_demangle_passes_other_text_through() {
    assert_eq!(demangled_text("main"), "main");
    assert_eq!(demangled_text("$zq3foo"), "$zq3foo");
    assert_eq!(demangled_text("$zf99say"), "$zf99say");
}

#[test]
fn test_explanation() {
    assert_eq!(
        explanation("invalid_redeclaration").as_deref(),
        Some("invalid_redeclaration (error)\n\n    invalid redeclaration of '%s'\n")
    );
    assert!(explanation("division_by_zero").unwrap().contains("division by zero"));
    assert_eq!(explanation("E0001"), None);
}

#[test]
fn test_render_container() {
    let story = StoryIr::from_parts(
        Locale::Cn,
        vec![
            StepAction::Telop {
                text: "hello".to_owned(),
            },
            StepAction::ForkTask(vec![StepAction::Delay { seconds: 1.0 }]),
        ],
    );
    let bytes = zeile_codec::encode(&story).unwrap();

    let text = render_container(&bytes).unwrap();
    assert!(text.starts_with("; locale: cn\n; actions: 2 (3 total)\n"), "{text}");
    assert!(text.ends_with(&story.to_plain_text()));

    assert_eq!(
        render_container_as(&bytes, InspectFormat::Sirius).unwrap(),
        story.to_sirius()
    );
}

#[test]
fn test_render_rejects_non_containers() {
    assert!(matches!(
        render_container(b"not a story"),
        Err(CodecError::MissingHeaderMagic)
    ));
}

#[test]
fn test_stdlib_symbols_are_sorted_and_demangle() {
    let symbols = stdlib_symbols();
    assert_eq!(symbols.len(), 24);
    assert!(symbols.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(symbols.contains(&"$zf3say1_6StringrV".to_owned()));
    assert!(symbols.iter().all(|symbol| demangle(symbol).is_some()));
}
