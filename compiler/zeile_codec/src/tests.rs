#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use zeile_ir::{Locale, Position, PositionBase, StepAction, StoryIr};

use super::*;

fn sample_story() -> StoryIr {
    StoryIr::from_parts(
        Locale::En,
        vec![
            StepAction::ChangeBackground {
                path: "bg/rooftop".to_owned(),
            },
            StepAction::ShowModel {
                character_id: 1,
                model_path: "models/kasumi".to_owned(),
                position: Position {
                    base: PositionBase::LeftInside,
                    offset_x: 0.5,
                },
            },
            StepAction::Talk {
                text: "Hello!".to_owned(),
                character_ids: vec![1],
                character_names: vec!["Kasumi".to_owned()],
                voice_path: Some("voice/k001".to_owned()),
            },
            StepAction::Blocking(vec![StepAction::Delay { seconds: 1.5 }]),
            StepAction::ForkTask(vec![StepAction::HideModel { character_id: 1 }]),
            StepAction::WaitForAll,
        ],
    )
}

#[test]
fn test_round_trip() {
    let story = sample_story();
    let bytes = encode(&story).unwrap();
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_empty_story_round_trip() {
    let story = StoryIr::new(Locale::Kr);
    let bytes = encode(&story).unwrap();
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_payload_spanning_many_pages() {
    let actions = (0..500)
        .map(|i| StepAction::Telop {
            text: format!("line number {i}"),
        })
        .collect();
    let story = StoryIr::from_parts(Locale::Tw, actions);

    let bytes = encode(&story).unwrap();
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_layout() {
    let bytes = encode(&sample_story()).unwrap();

    assert_eq!(&bytes[..3], b"ZIR");
    assert_eq!(bytes[3], 0x18);
    assert_eq!(&bytes[4..12], &1_u64.to_le_bytes());
    assert_eq!(&bytes[bytes.len() - 4..], b"ZIR$");
    assert!(is_container(&bytes));
}

#[test]
fn test_missing_header_fails_closed() {
    let mut bytes = encode(&sample_story()).unwrap();
    bytes[0] = b'X';
    assert!(matches!(decode(&bytes), Err(CodecError::MissingHeaderMagic)));
    assert!(!is_container(&bytes));
}

#[test]
fn test_bare_lz4_frame_is_rejected() {
    let bytes = encode(&sample_story()).unwrap();
    let mut frame = LZ4_MAGIC.to_vec();
    frame.extend_from_slice(&bytes[12..bytes.len() - 4]);
    frame.extend_from_slice(&[0; 4]);
    assert!(matches!(decode(&frame), Err(CodecError::MissingHeaderMagic)));
}

#[test]
fn test_missing_end_marker_fails_closed() {
    let mut bytes = encode(&sample_story()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 0;
    assert!(matches!(decode(&bytes), Err(CodecError::MissingEndMarker)));
}

#[test]
fn test_truncated_container() {
    let result = decode(b"ZIR\x18ZIR$");
    assert!(matches!(result, Err(CodecError::Truncated { len: 8 })));
}

#[test]
fn test_unknown_locale_tag() {
    let mut bytes = encode(&sample_story()).unwrap();
    bytes[4] = 9;
    assert!(matches!(decode(&bytes), Err(CodecError::UnknownLocale { tag: 9 })));
}

#[test]
fn test_higher_metadata_bytes_are_ignored() {
    let story = sample_story();
    let mut bytes = encode(&story).unwrap();
    bytes[11] = 0xff;
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_corrupt_payload_fails_closed() {
    let mut bytes = encode(&sample_story()).unwrap();
    // Frame descriptor flags: an unsupported version.
    bytes[12] = 0;
    assert!(matches!(decode(&bytes), Err(CodecError::Decompress(_))));
}

/// Container holding `flat` as written, skipping the checks of `encode`.
fn container_of(flat: &[WireAction]) -> Vec<u8> {
    frame(&bincode::serialize(flat).unwrap(), Locale::Jp).unwrap()
}

fn nested(depth: usize) -> StepAction {
    let mut action = StepAction::WaitForAll;
    for level in 0..depth {
        action = if level % 2 == 0 {
            StepAction::Blocking(vec![action])
        } else {
            StepAction::ForkTask(vec![StepAction::Delay { seconds: 0.5 }, action])
        };
    }
    action
}

#[test]
fn test_nesting_at_the_limit_round_trips() {
    let story = StoryIr::from_parts(Locale::Cn, vec![nested(MAX_NESTING), StepAction::WaitForAll]);
    let bytes = encode(&story).unwrap();
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_encode_rejects_nesting_past_the_limit() {
    let story = StoryIr::from_parts(Locale::Cn, vec![nested(MAX_NESTING + 1)]);
    assert!(matches!(
        encode(&story),
        Err(CodecError::NestingTooDeep { limit: MAX_NESTING })
    ));
}

#[test]
fn test_deeply_nested_payload_fails_closed() {
    let mut flat = vec![WireAction::Blocking { children: 1 }; 200_000];
    flat.push(WireAction::WaitForAll);
    assert!(matches!(
        decode(&container_of(&flat)),
        Err(CodecError::NestingTooDeep { limit: MAX_NESTING })
    ));
}

#[test]
fn test_empty_lists_round_trip() {
    let story = StoryIr::from_parts(
        Locale::Jp,
        vec![
            StepAction::Blocking(vec![]),
            StepAction::ForkTask(vec![StepAction::Blocking(vec![])]),
            StepAction::WaitForAll,
        ],
    );
    let bytes = encode(&story).unwrap();
    assert_eq!(decode(&bytes).unwrap(), story);
}

#[test]
fn test_unterminated_list_fails_closed() {
    let flat = [
        WireAction::ForkTask { children: 3 },
        WireAction::WaitForAll,
    ];
    assert!(matches!(
        decode(&container_of(&flat)),
        Err(CodecError::UnterminatedList)
    ));
}

#[test]
fn test_oversized_child_count_fails_closed() {
    let flat = [
        WireAction::Blocking {
            children: usize::MAX,
        },
        WireAction::WaitForAll,
    ];
    assert!(matches!(
        decode(&container_of(&flat)),
        Err(CodecError::UnterminatedList)
    ));
}

#[test]
fn test_oversized_payload_fails_closed() {
    let bytes = frame(&vec![0; MAX_PLAIN_LEN + 1], Locale::Jp).unwrap();
    assert!(bytes.len() < MAX_PLAIN_LEN / 100);
    assert!(matches!(
        decode(&bytes),
        Err(CodecError::PayloadTooLarge {
            limit: MAX_PLAIN_LEN
        })
    ));
}

#[test]
fn test_encode_rejects_oversized_payload() {
    let story = StoryIr::from_parts(
        Locale::Jp,
        vec![StepAction::Telop {
            text: "a".repeat(MAX_PLAIN_LEN),
        }],
    );
    assert!(matches!(
        encode(&story),
        Err(CodecError::PayloadTooLarge { .. })
    ));
}

#[test]
fn test_nan_keeps_its_bits() {
    let story = StoryIr::from_parts(Locale::En, vec![StepAction::Delay { seconds: f64::NAN }]);
    let decoded = decode(&encode(&story).unwrap()).unwrap();

    let [StepAction::Delay { seconds }] = decoded.actions() else {
        panic!("unexpected actions {:?}", decoded.actions());
    };
    assert_eq!(seconds.to_bits(), f64::NAN.to_bits());
    assert_ne!(decoded, story);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        CodecError::Truncated { len: 3 }.to_string(),
        "container truncated: 3 bytes, need at least 16"
    );
    assert_eq!(
        CodecError::UnknownLocale { tag: 7 }.to_string(),
        "unknown locale tag 7"
    );
    assert_eq!(
        CodecError::NestingTooDeep { limit: 256 }.to_string(),
        "actions nest deeper than 256 levels"
    );
}
