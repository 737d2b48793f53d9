use pretty_assertions::assert_eq;
use zeile_ir::{ExprId, UnitId};

use super::*;

#[test]
fn test_literals_carry_their_type() {
    assert_eq!(RuntimeObject::int(3).ty, "Int");
    assert_eq!(RuntimeObject::float(0.5).ty, "Float");
    assert_eq!(RuntimeObject::bool(true).ty, "Bool");
    assert_eq!(RuntimeObject::string("hi").ty, "String");
    assert_eq!(RuntimeObject::int(3).as_int(), Some(3));
    assert_eq!(RuntimeObject::int(3).as_float(), None);
    assert_eq!(RuntimeObject::string("hi").as_str(), Some("hi"));
}

#[test]
fn test_storage_from_literal_collapses() {
    assert_eq!(
        Storage::from(RuntimeObject::int(7)),
        Storage::Trivial(Trivial::Int(7))
    );
    let case = RuntimeObject::enum_case("PositionBase", "left");
    assert_eq!(Storage::from(case.clone()), Storage::NonTrivial(case));
}

#[test]
fn test_fields_round_trip_through_storage() {
    let hero = RuntimeObject::new("Character")
        .with_storage("id", RuntimeObject::int(1).into())
        .with_storage("name", RuntimeObject::string("Kasumi").into());

    assert_eq!(hero.field("id"), Some(RuntimeObject::int(1)));
    assert_eq!(hero.field("name").and_then(|n| n.as_str().map(str::to_owned)), Some("Kasumi".to_owned()));
    assert_eq!(hero.field("missing"), None);
    assert_eq!(hero.to_string(), "Kasumi");
}

#[test]
fn test_function_bundle() {
    let receiver = RuntimeObject::new("Character");
    let bundle = RuntimeObject::functions(
        vec!["$zf1aSrV".to_owned(), "$zf1brV".to_owned()],
        Some(receiver.clone()),
    );

    assert!(bundle.is_functions());
    assert_eq!(bundle.function_names(), vec!["$zf1aSrV", "$zf1brV"]);
    assert_eq!(bundle.bound_self(), Some(&receiver));

    let unbound = RuntimeObject::functions(Vec::new(), None);
    assert!(unbound.function_names().is_empty());
    assert_eq!(unbound.bound_self(), None);
}

#[test]
fn test_metatype() {
    let ty = RuntimeObject::metatype("Character");
    assert_eq!(ty.ty, "Character.Type");
    assert_eq!(ty.metatype_name(), Some("Character"));
    assert_eq!(RuntimeObject::int(1).metatype_name(), None);
}

#[test]
fn test_closure_target() {
    let closure = RuntimeObject::closure(UnitId::new(1), ExprId::new(42), 3);
    assert_eq!(
        closure.closure_target(),
        Some((UnitId::new(1), ExprId::new(42), 3))
    );
    assert_eq!(RuntimeObject::int(1).closure_target(), None);
}

#[test]
fn test_display_for_interpolation() {
    assert_eq!(RuntimeObject::int(-2).to_string(), "-2");
    assert_eq!(RuntimeObject::float(1.5).to_string(), "1.5");
    assert_eq!(RuntimeObject::bool(false).to_string(), "false");
    assert_eq!(RuntimeObject::enum_case("PositionBase", "center").to_string(), "center");
    assert_eq!(RuntimeObject::metatype("Position").to_string(), "Position.Type");
}
