//! Tests for declaration checks and table registration.

use pretty_assertions::assert_eq;
use zeile_diagnostic::DiagnosticId;
use zeile_ir::{
    Binding, Block, Decl, DeclKind, FunctionDecl, Ident, Item, ParamDecl, Pattern, Span,
    TypeKind, TypeSyntax, VariableDecl,
};

use super::{check, ids};

fn static_let(name: &str, annotation: &str, initializer: zeile_ir::ExprId) -> Decl {
    Decl::new(DeclKind::Variable(VariableDecl {
        specifier: Ident::synthetic("let"),
        bindings: vec![Binding {
            pattern: Pattern::Identifier(Ident::synthetic(name)),
            annotation: Some(TypeSyntax::named(annotation)),
            initializer: Some(initializer),
            span: Span::DUMMY,
        }],
    }))
    .with_modifier("static")
}

#[test]
fn test_struct_redeclaration_keeps_first() {
    let (tables, diagnostics) = check(|b| {
        let a = b.let_decl("a", Some("Int"), None);
        let first = b.struct_decl("Foo", vec![a]);
        b.item_decl(first);
        let other = b.let_decl("b", Some("String"), None);
        let second = b.struct_decl("Foo", vec![other]);
        b.item_decl(second);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::InvalidRedeclaration]);
    assert_eq!(diagnostics[0].message, "invalid redeclaration of 'Foo'");
    let foo = &tables.structs["Foo"];
    assert!(foo.instance_vars.contains_key("a"));
    assert!(!foo.instance_vars.contains_key("b"));
}

#[test]
fn test_struct_cannot_shadow_enum() {
    let (tables, diagnostics) = check(|b| {
        let e = b.enum_decl("Mood", &["happy"]);
        b.item_decl(e);
        let s = b.struct_decl("Mood", vec![]);
        b.item_decl(s);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::InvalidRedeclaration]);
    assert!(tables.enums.contains_key("Mood"));
    assert!(!tables.structs.contains_key("Mood"));
}

#[test]
fn test_duplicate_enum_case() {
    let (tables, diagnostics) = check(|b| {
        let e = b.enum_decl("Mood", &["happy", "sad", "happy"]);
        b.item_decl(e);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::InvalidRedeclaration]);
    assert_eq!(tables.enums["Mood"].cases, vec!["happy", "sad"]);
}

#[test]
fn test_empty_enum() {
    let (_, diagnostics) = check(|b| {
        let e = b.enum_decl("Nothing", &[]);
        b.item_decl(e);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::MissingMemberBlock]);
}

#[test]
fn test_function_redeclaration_by_shape() {
    let (tables, diagnostics) = check(|b| {
        let f = b.function(FunctionDecl::new("talk").param("_", "String"));
        b.item_decl(f);
        // Return type and effects do not distinguish overloads.
        let g = b.function(
            FunctionDecl::new("talk")
                .param("_", "String")
                .returns("Int"),
        );
        b.item_decl(g);
        let h = b.function(FunctionDecl::new("talk").param("to", "String"));
        b.item_decl(h);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::InvalidRedeclaration]);
    assert_eq!(
        diagnostics[0].message,
        "invalid redeclaration of 'talk(_: String) -> Int'"
    );
    assert_eq!(tables.top_functions_named("talk").count(), 2);
}

#[test]
fn test_function_body_rejected() {
    let (tables, diagnostics) = check(|b| {
        let mut f = FunctionDecl::new("talk");
        f.body = Some(Block::default());
        let id = b.function(f);
        b.item_decl(id);
    });

    assert_eq!(ids(&diagnostics), vec![DiagnosticId::FunctionUnexpectedBody]);
    // The signature is still registered.
    assert_eq!(tables.top_functions_named("talk").count(), 1);
}

#[test]
fn test_param_second_name_is_a_warning() {
    let (tables, diagnostics) = check(|b| {
        let mut param = ParamDecl::new("to", TypeSyntax::named("String"));
        param.second_name = Some(Ident::synthetic("target"));
        let id = b.function(FunctionDecl::new("talk").with_param(param));
        b.item_decl(id);
    });

    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::FunctionParamSecondNameIsUnused]
    );
    assert!(!diagnostics[0].is_error());
    let sig = tables.top_functions_named("talk").next().expect("registered");
    assert_eq!(sig.params[0].name, "to");
}

#[test]
fn test_optional_types_rejected() {
    let (tables, diagnostics) = check(|b| {
        let single = ParamDecl::new("x", TypeSyntax::optional(TypeSyntax::named("Int")));
        let nested = ParamDecl::new(
            "y",
            TypeSyntax::optional(TypeSyntax::optional(TypeSyntax::named("Int"))),
        );
        let id = b.function(FunctionDecl::new("f").with_param(single).with_param(nested));
        b.item_decl(id);
    });

    assert_eq!(
        ids(&diagnostics),
        vec![
            DiagnosticId::ContextOptionalTypeNotSupported,
            DiagnosticId::NestingOptionalTypeNotSupported,
        ]
    );
    // Unresolvable parameters are dropped from the signature.
    assert_eq!(tables.top_functions[15].arity(), 0);
}

#[test]
fn test_generic_arguments_rejected() {
    let (_, diagnostics) = check(|b| {
        let ty = TypeSyntax {
            kind: TypeKind::Identifier {
                name: "Int".to_owned(),
                generic_args: Some(Span::new(4, 9)),
            },
            span: Span::new(0, 9),
        };
        let id = b.function(FunctionDecl::new("f").with_param(ParamDecl::new("x", ty)));
        b.item_decl(id);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::GenericNotSupported]);
}

#[test]
fn test_unknown_type() {
    let (_, diagnostics) = check(|b| {
        let id = b.let_decl("x", Some("Dragon"), None);
        b.item_decl(id);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::CannotFindTypeInScope]);
    assert_eq!(diagnostics[0].message, "cannot find type 'Dragon' in scope");
}

#[test]
fn test_types_may_be_referenced_before_declaration() {
    let (tables, diagnostics) = check(|b| {
        let f = b.function(FunctionDecl::new("meet").param("_", "Hero"));
        b.item_decl(f);
        let hero = b.struct_decl("Hero", vec![]);
        b.item_decl(hero);
    });

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let sig = tables.top_functions_named("meet").next().expect("registered");
    assert_eq!(sig.params[0].type_name, "Hero");
}

#[test]
fn test_static_outside_struct() {
    let (_, diagnostics) = check(|b| {
        let one = b.int(1);
        let id = b.push_decl(static_let("x", "Int", one));
        b.item_decl(id);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::StaticOutsideStruct]);
}

#[test]
fn test_static_members_registered() {
    let (tables, diagnostics) = check(|b| {
        let one = b.int(1);
        let count = b.push_decl(static_let("count", "Int", one));
        let hop = b.static_function(FunctionDecl::new("hop"));
        let name = b.let_decl("name", Some("String"), None);
        let s = b.struct_decl("Frog", vec![count, hop, name]);
        b.item_decl(s);
    });

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let frog = &tables.structs["Frog"];
    assert!(frog.static_vars.contains_key("count"));
    assert!(frog.instance_vars.contains_key("name"));
    assert_eq!(frog.methods_named("hop", true).count(), 1);
    assert_eq!(frog.methods_named("hop", false).count(), 0);
}

#[test]
fn test_var_specifier_rejected() {
    let (_, diagnostics) = check(|b| {
        let one = b.int(1);
        let id = b.push_decl(Decl::new(DeclKind::Variable(VariableDecl {
            specifier: Ident::synthetic("var"),
            bindings: vec![Binding {
                pattern: Pattern::Identifier(Ident::synthetic("x")),
                annotation: None,
                initializer: Some(one),
                span: Span::DUMMY,
            }],
        })));
        b.item_decl(id);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::VariableSpecifierNotSupported]
    );
}

#[test]
fn test_let_without_type_or_initializer() {
    let (tables, diagnostics) = check(|b| {
        let id = b.let_decl("x", None, None);
        b.item_decl(id);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::CannotInferTypeWithoutInitializer]
    );
    assert!(!tables.top_vars.contains_key("x"));
}

#[test]
fn test_initializer_type_mismatch_registers_nothing() {
    let (tables, diagnostics) = check(|b| {
        let hi = b.string("hi");
        let id = b.let_decl("x", Some("Int"), Some(hi));
        b.item_decl(id);
    });

    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::SpecifiedTypeNotMatchToInitializer]
    );
    assert_eq!(
        diagnostics[0].message,
        "cannot convert value of type 'String' to specified type 'Int'"
    );
    assert!(!tables.top_vars.contains_key("x"));
}

#[test]
fn test_inferred_variable_type() {
    let (tables, diagnostics) = check(|b| {
        let one = b.float(1.5);
        let id = b.let_decl("x", None, Some(one));
        b.item_decl(id);
    });

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(tables.top_vars["x"].type_name, "Float");
    assert!(tables.top_vars["x"].initializer.is_some());
}

#[test]
fn test_self_referencing_initializer() {
    let (_, diagnostics) = check(|b| {
        let a = b.ident("a");
        let id = b.let_decl("a", Some("Int"), Some(a));
        b.item_decl(id);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::CircularReference]);
    assert_eq!(diagnostics[0].id.as_str(), "circulat_reference_in_expression");
}

#[test]
fn test_self_referencing_static_member() {
    let (_, diagnostics) = check(|b| {
        let base = b.ident("Loop");
        let again = b.member(base, "again");
        let member = b.push_decl(static_let("again", "Int", again));
        let s = b.struct_decl("Loop", vec![member]);
        b.item_decl(s);
    });
    assert_eq!(ids(&diagnostics), vec![DiagnosticId::CircularReference]);
}

#[test]
fn test_nested_declarations_rejected() {
    let (_, diagnostics) = check(|b| {
        let inner = b.struct_decl("Inner", vec![]);
        let outer = b.struct_decl("Outer", vec![inner]);
        b.item_decl(outer);

        let local = b.enum_decl("Local", &["a"]);
        let closure = b.closure(vec![Item::decl(local)]);
        let call = b.call_named("blocking", &[(None, closure)]);
        b.item_expr(call);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![
            DiagnosticId::NestedDeclarationNotSupported,
            DiagnosticId::NestedDeclarationNotSupported,
        ]
    );
}

#[test]
fn test_initializer_outside_struct() {
    let (_, diagnostics) = check(|b| {
        let id = b.function(FunctionDecl::initializer());
        b.item_decl(id);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![DiagnosticId::UnexpectedTopLevelTypeCheckPath]
    );
}

#[test]
fn test_attributes_and_other_declarations() {
    let (_, diagnostics) = check(|b| {
        let id = b.push_decl(
            Decl::new(DeclKind::Function(FunctionDecl::new("f"))).with_attribute("inline"),
        );
        b.item_decl(id);
        let other = b.push_decl(Decl::new(DeclKind::Other("protocol".to_owned())));
        b.item_decl(other);
    });
    assert_eq!(
        ids(&diagnostics),
        vec![
            DiagnosticId::AttributesNotSupported,
            DiagnosticId::UnsupportedDeclaration,
        ]
    );
    assert_eq!(
        diagnostics[1].message,
        "'protocol' declarations are not supported here"
    );
}
