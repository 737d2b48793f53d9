//! The fixed catalog of diagnostic kinds.
//!
//! Each kind has a stable snake_case id (used by `zeile explain` and by
//! tests), a default severity, and a message template where `%s` marks a
//! parameter filled in by the reporting site.

use std::fmt;

use crate::Severity;

macro_rules! define_catalog {
    ($(
        $(#[$doc:meta])*
        $variant:ident => ($id:literal, $severity:ident, $template:literal),
    )*) => {
        /// Identifier of a diagnostic kind.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum DiagnosticId {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl DiagnosticId {
            /// Every kind, in catalog order.
            pub const ALL: &'static [DiagnosticId] = &[$(DiagnosticId::$variant,)*];

            /// Stable machine-readable id.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(DiagnosticId::$variant => $id,)*
                }
            }

            /// Severity a diagnostic of this kind is reported with.
            pub const fn default_severity(self) -> Severity {
                match self {
                    $(DiagnosticId::$variant => Severity::$severity,)*
                }
            }

            /// Message template; `%s` marks a parameter.
            pub const fn template(self) -> &'static str {
                match self {
                    $(DiagnosticId::$variant => $template,)*
                }
            }
        }
    };
}

define_catalog! {
    // Input
    /// Problem reported by the parser.
    SyntaxError => ("syntax_error", Error, "%s"),
    /// A top-level item that is neither a declaration, statement nor expression.
    UnrecognizedTopLevelSyntax => ("unrecognized_top_level_syntax", Error, "unrecognized top-level syntax"),
    /// Statements such as `if` or `for`.
    UnsupportedStatement => ("unsupported_statement", Error, "'%s' statements are not supported"),
    /// Declarations other than struct, enum, func, and let.
    UnsupportedDeclaration => ("unsupported_declaration", Error, "'%s' declarations are not supported here"),
    UnsupportedExpression => ("unsupported_expression", Error, "%s expressions are not supported"),
    AttributesNotSupported => ("attributes_syntax_not_supported", Error, "attributes are not supported"),
    DeclModifierNotSupported => ("decl_modifier_not_supported", Error, "declaration modifier '%s' is not supported here"),
    GenericNotSupported => ("generic_syntax_not_supported", Error, "generics are not supported"),
    InheritanceNotSupported => ("inheritance_syntax_not_supported", Error, "inheritance and conformance clauses are not supported"),
    WhereClauseNotSupported => ("where_clause_syntax_not_supported", Error, "'where' clauses are not supported"),

    // Enums
    MissingMemberBlock => ("missing_member_block", Error, "enum '%s' must declare at least one case"),
    UnsupportedDeclInEnum => ("unsupported_decl_in_enum", Error, "enums may only contain 'case' declarations"),
    MissingIdentifierInEnumCase => ("missing_identifier_in_enum_case", Error, "'case' declaration requires at least one name"),
    EnumCaseParameterNotSupported => ("enum_case_parameter_not_supported", Error, "enum cases cannot have associated values"),
    EnumRawValueNotSupported => ("enum_raw_value_not_supported", Error, "enum cases cannot have raw values"),

    // Declaration structure
    /// A struct or enum declared inside another declaration.
    NestedDeclarationNotSupported => ("nested_declaration_not_supported", Error, "'%s' may only be declared at file scope"),
    /// A declaration reached the top-level check from a nested position.
    UnexpectedTopLevelTypeCheckPath => ("unexpected_top_level_type_check_path", Error, "declaration is not at top level"),
    FunctionUnexpectedBody => ("function_unexpected_body", Error, "function declarations cannot have a body"),
    /// The internal parameter name is never used because bodies are not allowed.
    FunctionParamSecondNameIsUnused => ("function_param_second_name_is_unused", Warning, "parameter name '%s' is never used"),
    FunctionParamUnexpectedEllipsis => ("function_param_unexpected_ellipsis", Error, "variadic parameters are not supported"),
    FunctionParamUnsupportedDefaultValueDecl => ("function_param_unsupported_default_value_decl", Error, "default parameter values are not supported"),
    FunctionThrowsNotSupported => ("function_throws_not_supported", Error, "throwing functions are not supported"),
    NestingOptionalTypeNotSupported => ("nesting_optional_type_not_supported", Error, "nested optional types are not supported"),
    ContextOptionalTypeNotSupported => ("context_optional_type_not_supported", Error, "optional types are not supported in this position"),
    UnsupportedTypeSyntax => ("unsupported_type_syntax", Error, "this kind of type is not supported"),
    UnsupportedMemberInStruct => ("unsupported_member_in_struct", Error, "'%s' is not allowed as a struct member"),
    VariableSpecifierNotSupported => ("variable_specifier_not_supported", Error, "'%s' is not supported; use 'let'"),
    DuplicateStaticModifier => ("duplicate_static_modifier", Error, "duplicate 'static' modifier"),
    StaticOutsideStruct => ("static_outside_struct", Error, "'static' is only allowed on struct members"),
    UnsupportedBindingPattern => ("unsupported_binding_pattern", Error, "only a single identifier can be bound"),
    InvalidRedeclaration => ("invalid_redeclaration", Error, "invalid redeclaration of '%s'"),

    // Name and type resolution
    CannotFindTypeInScope => ("cannot_find_type_in_scope", Error, "cannot find type '%s' in scope"),
    CannotFindInScope => ("cannot_find_in_scope", Error, "cannot find '%s' in scope"),
    ValueHasNoMember => ("value_has_no_member", Error, "value of type '%s' has no member '%s'"),
    TypeHasNoMember => ("type_has_no_member", Error, "type '%s' has no member '%s'"),
    CannotInferImplicitMemberBase => ("cannot_infer_implicit_member_base", Error, "cannot infer contextual base in reference to member '%s'"),
    SpecifiedTypeNotMatchToInitializer => ("specified_type_not_match_to_initializer", Error, "cannot convert value of type '%s' to specified type '%s'"),
    CannotInferTypeWithoutInitializer => ("cannot_infer_type_without_initializer", Error, "type annotation missing in pattern"),
    /// A variable whose initializer refers back to itself.
    CircularReference => ("circulat_reference_in_expression", Error, "circular reference in expression of '%s'"),
    /// The standard library unit does not declare a builtin type.
    MissingStdlibType => ("missing_stdlib_type", Error, "standard library type '%s' is not declared"),
    MemberOnFunctionReference => ("member_on_function_reference", Error, "function '%s' has no member '%s'"),
    FunctionUsedAsValue => ("function_used_as_value", Error, "function '%s' must be called"),
    CannotCallNonFunction => ("cannot_call_non_function", Error, "cannot call value of non-function type '%s'"),
    NoInitializer => ("no_initializer", Error, "'%s' cannot be constructed because it has no initializers"),

    // Calls
    CallExtraneousArgumentLabel => ("call_extraneous_argument_label", Error, "extraneous argument label '%s:' in call"),
    CallMissingArgumentLabel => ("call_missing_argument_label", Error, "missing argument label '%s:' in call"),
    CallIncorrectArgumentLabel => ("call_incorrect_argument_label", Error, "incorrect argument label in call (have '%s:', expected '%s:')"),
    CallArgumentTypeMismatch => ("call_argument_type_mismatch", Error, "cannot convert value of type '%s' to expected argument type '%s'"),
    /// No candidate with the right name and arity.
    CallNoExactMatch => ("call_no_exact_match", Error, "no exact matches in call to '%s'"),
    /// More than one candidate accepts an implicit member argument.
    CallAmbiguousMemberOverload => ("call_ambiguous_member_overload", Error, "ambiguous use of implicit member '%s' in call to '%s'"),
    CallAmbiguousOverload => ("call_ambiguous_overload", Error, "ambiguous use of '%s'"),
    AwaitNonAsyncCall => ("await_non_async_call", Error, "'await' applied to call of non-async function '%s'"),

    // Operators
    SequenceFoldFailed => ("sequence_fold_failed", Error, "operator sequence could not be folded"),
    UnknownOperator => ("unknown_operator", Error, "unknown operator '%s'"),
    BinaryOperatorTypeMismatch => ("binary_operator_type_mismatch", Error, "binary operator '%s' cannot be applied to operands of type '%s' and '%s'"),

    // Shebang
    InvalidShebang => ("invalid_shebang", Warning, "malformed shebang; expected 'key = value'"),
    UnknownShebangKey => ("unknown_shebang_key", Warning, "unknown shebang key '%s'"),
    UnknownLocale => ("unknown_locale", Warning, "unknown locale '%s'; using 'jp'"),

    // IR generation
    UsedBeforeInitialization => ("used_before_initialization", Error, "'%s' used before being initialized"),
    /// A call with no resolution recorded by semantic analysis.
    UnresolvedCallInIrGen => ("unresolved_call_in_irgen", Note, "call was not resolved during semantic analysis; no IR emitted"),
    MissingNativeImplementation => ("missing_native_implementation", Remark, "no native implementation for '%s'; call ignored"),
    NativeArgumentInvalid => ("native_argument_invalid", Error, "invalid argument for '%s': %s"),
    DivisionByZero => ("division_by_zero", Error, "division by zero"),
    IntegerOverflow => ("integer_overflow", Error, "integer overflow in '%s'"),
}

impl DiagnosticId {
    /// Number of `%s` parameters in the template.
    pub fn parameter_count(self) -> usize {
        self.template().matches("%s").count()
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an id string like `"invalid_redeclaration"`.
impl std::str::FromStr for DiagnosticId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
