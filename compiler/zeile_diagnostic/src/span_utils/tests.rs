use super::*;

#[test]
fn test_line_offset_table() {
    let source = "say(\"a\")\nsay(\"b\")\n\nlet x = 1";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 4);
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(9), 2);
    assert_eq!(table.line_from_offset(18), 3);
    assert_eq!(table.offset_to_line_col(source, 23), (4, 5));
    assert_eq!(table.line_start_offset(2), Some(9));
    assert_eq!(table.line_start_offset(0), None);
    assert_eq!(table.line_start_offset(9), None);
}

#[test]
fn test_column_counts_characters() {
    let source = "let 名前 = x";
    // 'x' sits after two 3-byte characters.
    let offset = u32::try_from(source.find('x').unwrap_or_default()).unwrap_or_default();
    assert_eq!(offset_to_line_col(source, offset), (1, 10));
}

#[test]
fn test_offset_past_end_is_clamped() {
    let source = "ab";
    assert_eq!(offset_to_line_col(source, 100), (1, 3));
}

#[test]
fn test_line_text_and_number() {
    let source = "first\nsecond\nthird";
    assert_eq!(line_text(source, 2), Some("second"));
    assert_eq!(line_text(source, 0), None);
    assert_eq!(line_text(source, 4), None);
    assert_eq!(line_number(source, Span::new(13, 15)), 3);
}
