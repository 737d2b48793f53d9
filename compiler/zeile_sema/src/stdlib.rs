//! The standard library unit.
//!
//! Declares the builtin types and the staging API every script can call.
//! Behavior lives in the interpreter's virtual table; the declarations
//! here only give overload resolution something to resolve against.

use zeile_ir::{FunctionDecl, PositionBase, SourceUnit, UnitBuilder};

pub const STDLIB_UNIT_NAME: &str = "<stdlib>";

/// Types literals resolve to.
pub const STDLIB_TYPES: [&str; 5] = ["Bool", "Int", "Float", "String", "Closure"];

/// Build the standard library unit. It must be unit 0 of every compilation.
pub fn stdlib_unit() -> SourceUnit {
    let mut b = UnitBuilder::new(STDLIB_UNIT_NAME);

    for name in STDLIB_TYPES {
        let id = b.struct_decl(name, Vec::new());
        b.item_decl(id);
    }

    let cases: Vec<&str> = PositionBase::ALL.iter().map(|p| p.case_name()).collect();
    let position_base = b.enum_decl("PositionBase", &cases);
    b.item_decl(position_base);

    let members = vec![
        b.function(
            FunctionDecl::initializer()
                .param("_", "PositionBase")
                .param("offsetX", "Float"),
        ),
        b.let_decl("base", Some("PositionBase"), None),
        b.let_decl("offsetX", Some("Float"), None),
    ];
    let position = b.struct_decl("Position", members);
    b.item_decl(position);

    let members = vec![
        b.function(FunctionDecl::initializer().param("id", "Int")),
        b.let_decl("id", Some("Int"), None),
        b.let_decl("name", Some("String"), None),
        b.function(
            FunctionDecl::new("show")
                .param("model", "String")
                .param("at", "PositionBase"),
        ),
        b.function(
            FunctionDecl::new("show")
                .param("model", "String")
                .param("at", "Position"),
        ),
        b.function(FunctionDecl::new("hide")),
        b.function(FunctionDecl::new("move").param("to", "PositionBase")),
        b.function(FunctionDecl::new("move").param("to", "Position")),
        b.function(FunctionDecl::new("act").param("_", "String")),
        b.function(FunctionDecl::new("express").param("_", "String")),
    ];
    let character = b.struct_decl("Character", members);
    b.item_decl(character);

    let functions = [
        FunctionDecl::new("say").param("_", "String"),
        FunctionDecl::new("say")
            .param("_", "String")
            .param("speaker", "Character"),
        FunctionDecl::new("say")
            .param("_", "String")
            .param("speaker", "Character")
            .param("voice", "String"),
        FunctionDecl::new("telop").param("_", "String"),
        FunctionDecl::new("showBlackCover").param("duration", "Float"),
        FunctionDecl::new("hideBlackCover").param("duration", "Float"),
        FunctionDecl::new("showWhiteCover").param("duration", "Float"),
        FunctionDecl::new("hideWhiteCover").param("duration", "Float"),
        FunctionDecl::new("changeBackground").param("_", "String"),
        FunctionDecl::new("changeBGM").param("_", "String"),
        FunctionDecl::new("changeSE").param("_", "String"),
        FunctionDecl::new("blocking").param("_", "Closure"),
        FunctionDecl::new("fork").param("_", "Closure"),
        FunctionDecl::new("delay")
            .param("seconds", "Float")
            .asynchronous(),
        FunctionDecl::new("waitForAll").asynchronous(),
    ];
    for function in functions {
        let id = b.function(function);
        b.item_decl(id);
    }

    b.finish()
}
