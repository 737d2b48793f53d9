use rustc_hash::FxHashSet;

use super::*;

#[test]
fn test_ids_are_unique() {
    let mut seen = FxHashSet::default();
    for id in DiagnosticId::ALL {
        assert!(seen.insert(id.as_str()), "duplicate id {}", id.as_str());
    }
}

#[test]
fn test_ids_are_snake_case() {
    for id in DiagnosticId::ALL {
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'),
            "{id} is not snake_case"
        );
    }
}

#[test]
fn test_round_trip_through_from_str() {
    for id in DiagnosticId::ALL {
        assert_eq!(id.as_str().parse::<DiagnosticId>(), Ok(*id));
    }
    assert_eq!("no_such_id".parse::<DiagnosticId>(), Err(()));
}

#[test]
fn test_catalog_size() {
    assert!(DiagnosticId::ALL.len() >= 55);
}

#[test]
fn test_known_ids() {
    assert_eq!(DiagnosticId::InvalidRedeclaration.as_str(), "invalid_redeclaration");
    assert_eq!(
        DiagnosticId::CircularReference.as_str(),
        "circulat_reference_in_expression"
    );
    assert_eq!(
        DiagnosticId::SpecifiedTypeNotMatchToInitializer.as_str(),
        "specified_type_not_match_to_initializer"
    );
    assert_eq!(
        DiagnosticId::CallAmbiguousMemberOverload.as_str(),
        "call_ambiguous_member_overload"
    );
}

#[test]
fn test_default_severities() {
    assert_eq!(
        DiagnosticId::FunctionParamSecondNameIsUnused.default_severity(),
        Severity::Warning
    );
    assert_eq!(
        DiagnosticId::UnresolvedCallInIrGen.default_severity(),
        Severity::Note
    );
    assert_eq!(
        DiagnosticId::MissingNativeImplementation.default_severity(),
        Severity::Remark
    );
    assert_eq!(DiagnosticId::UnknownLocale.default_severity(), Severity::Warning);
    assert_eq!(DiagnosticId::InvalidRedeclaration.default_severity(), Severity::Error);
}

#[test]
fn test_parameter_count() {
    assert_eq!(DiagnosticId::CannotFindTypeInScope.parameter_count(), 1);
    assert_eq!(DiagnosticId::ValueHasNoMember.parameter_count(), 2);
    assert_eq!(DiagnosticId::DuplicateStaticModifier.parameter_count(), 0);
}
