//! Syntax tree for Zeile story scripts.
//!
//! The tree is the contract between the external parser and the compiler:
//! semantic analysis and IR generation only ever read it. Expressions and
//! declarations live in per-unit arenas and reference each other through
//! [`ExprId`] and [`DeclId`].
//!
//! The shape is deliberately wider than the accepted language. Generic
//! clauses, attributes, default values and similar constructs are carried
//! so that semantic analysis can point at them in a diagnostic.

mod builder;
mod operators;

pub use builder::UnitBuilder;
pub use operators::{fold_sequence, BinaryOp, FoldError, Folded};

use crate::{DeclId, ExprId, Span};

/// An identifier token with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Ident {
            text: text.into(),
            span,
        }
    }

    /// Identifier without a source location.
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self::new(text, Span::DUMMY)
    }
}

/// `@attribute` attached to a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub span: Span,
}

/// Declaration modifier such as `static` or `private`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub span: Span,
}

impl Modifier {
    pub fn is_static(&self) -> bool {
        self.name == "static"
    }
}

/// Problem reported by the parser, passed through semantic analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseIssue {
    pub message: String,
    pub span: Span,
}

/// The optional first line of a unit, e.g. `#! locale = en`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shebang {
    pub text: String,
    pub span: Span,
}

/// One parsed source file.
#[derive(Clone, Debug, Default)]
pub struct SourceUnit {
    /// Display name used in rendered diagnostics.
    pub name: String,
    /// Original source text, if available.
    pub text: Option<String>,
    pub shebang: Option<Shebang>,
    pub parse_issues: Vec<ParseIssue>,
    pub(crate) exprs: Vec<Expr>,
    pub(crate) decls: Vec<Decl>,
    pub(crate) block: Block,
}

impl SourceUnit {
    /// Get an expression by id.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get a declaration by id.
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    /// The top-level statement list.
    #[inline]
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Number of lines in the source text (0 if no text is attached).
    pub fn line_count(&self) -> usize {
        self.text.as_deref().map_or(0, |text| text.lines().count())
    }
}

/// An ordered list of statement items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

impl Item {
    pub fn decl(id: DeclId) -> Self {
        Item {
            kind: ItemKind::Decl(id),
            span: Span::DUMMY,
        }
    }

    pub fn expr(id: ExprId) -> Self {
        Item {
            kind: ItemKind::Expr(id),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Decl(DeclId),
    /// A statement (`if`, `for`, `return`, ...). The compiler accepts none,
    /// so only the keyword is kept.
    Stmt(String),
    Expr(ExprId),
    /// Something the parser could not classify at all.
    Unrecognized,
}

/// A declaration with the parts common to every kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub span: Span,
}

impl Decl {
    pub fn new(kind: DeclKind) -> Self {
        Decl {
            kind,
            attributes: Vec::new(),
            modifiers: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, name: impl Into<String>) -> Self {
        self.modifiers.push(Modifier {
            name: name.into(),
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Span covering the modifier list, falling back to the declaration.
    pub fn modifiers_span(&self) -> Span {
        self.modifiers
            .iter()
            .map(|m| m.span)
            .reduce(Span::merge)
            .unwrap_or(self.span)
    }

    /// Span covering the attribute list, falling back to the declaration.
    pub fn attributes_span(&self) -> Span {
        self.attributes
            .iter()
            .map(|a| a.span)
            .reduce(Span::merge)
            .unwrap_or(self.span)
    }

    pub fn has_static(&self) -> bool {
        self.modifiers.iter().any(Modifier::is_static)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    Struct(StructDecl),
    Enum(EnumDecl),
    EnumCase(EnumCaseDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    /// Any other declaration (`protocol`, `extension`, `import`, ...).
    Other(String),
}

impl DeclKind {
    /// Keyword describing the declaration kind, used in diagnostics.
    pub fn keyword(&self) -> &str {
        match self {
            DeclKind::Struct(_) => "struct",
            DeclKind::Enum(_) => "enum",
            DeclKind::EnumCase(_) => "case",
            DeclKind::Function(f) if f.is_initializer => "init",
            DeclKind::Function(_) => "func",
            DeclKind::Variable(v) => &v.specifier.text,
            DeclKind::Other(keyword) => keyword,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDecl {
    pub name: Ident,
    pub generic_clause: Option<Span>,
    pub inheritance_clause: Option<Span>,
    pub where_clause: Option<Span>,
    pub members: Vec<DeclId>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        StructDecl {
            name: Ident::synthetic(name),
            generic_clause: None,
            inheritance_clause: None,
            where_clause: None,
            members: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub generic_clause: Option<Span>,
    pub inheritance_clause: Option<Span>,
    pub where_clause: Option<Span>,
    pub members: Vec<DeclId>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        EnumDecl {
            name: Ident::synthetic(name),
            generic_clause: None,
            inheritance_clause: None,
            where_clause: None,
            members: Vec::new(),
        }
    }
}

/// `case a, b, c` inside an enum.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumCaseDecl {
    pub elements: Vec<EnumCaseElement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumCaseElement {
    pub name: Ident,
    /// `(Int, String)` associated values.
    pub parameter_clause: Option<Span>,
    /// `= 1` raw value.
    pub raw_value: Option<Span>,
}

impl EnumCaseElement {
    pub fn named(name: impl Into<String>) -> Self {
        EnumCaseElement {
            name: Ident::synthetic(name),
            parameter_clause: None,
            raw_value: None,
        }
    }
}

/// A function or initializer declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub is_initializer: bool,
    pub generic_clause: Option<Span>,
    pub where_clause: Option<Span>,
    pub params: Vec<ParamDecl>,
    pub async_span: Option<Span>,
    pub throws_span: Option<Span>,
    pub return_type: Option<TypeSyntax>,
    pub body: Option<Block>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDecl {
            name: Ident::synthetic(name),
            is_initializer: false,
            generic_clause: None,
            where_clause: None,
            params: Vec::new(),
            async_span: None,
            throws_span: None,
            return_type: None,
            body: None,
        }
    }

    /// An `init(...)` declaration.
    pub fn initializer() -> Self {
        FunctionDecl {
            is_initializer: true,
            ..Self::new("init")
        }
    }

    /// Append a parameter `label: Type`.
    #[must_use]
    pub fn param(mut self, label: &str, type_name: &str) -> Self {
        self.params.push(ParamDecl::new(label, TypeSyntax::named(type_name)));
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn returns(mut self, type_name: &str) -> Self {
        self.return_type = Some(TypeSyntax::named(type_name));
        self
    }

    #[must_use]
    pub fn asynchronous(mut self) -> Self {
        self.async_span = Some(Span::DUMMY);
        self
    }

    pub fn is_async(&self) -> bool {
        self.async_span.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub first_name: Ident,
    pub second_name: Option<Ident>,
    pub ty: TypeSyntax,
    pub ellipsis: Option<Span>,
    pub default_value: Option<ExprId>,
    pub span: Span,
}

impl ParamDecl {
    pub fn new(label: &str, ty: TypeSyntax) -> Self {
        ParamDecl {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            first_name: Ident::synthetic(label),
            second_name: None,
            ty,
            ellipsis: None,
            default_value: None,
            span: Span::DUMMY,
        }
    }
}

/// `let`/`var` declaration with one or more bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub specifier: Ident,
    pub bindings: Vec<Binding>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub pattern: Pattern,
    pub annotation: Option<TypeSyntax>,
    pub initializer: Option<ExprId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Identifier(Ident),
    /// Tuple, wildcard, or any other pattern.
    Other(Span),
}

/// A written type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSyntax {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeSyntax {
    pub fn named(name: &str) -> Self {
        TypeSyntax {
            kind: TypeKind::Identifier {
                name: name.to_owned(),
                generic_args: None,
            },
            span: Span::DUMMY,
        }
    }

    /// `wrapped?`
    pub fn optional(wrapped: TypeSyntax) -> Self {
        TypeSyntax {
            span: wrapped.span,
            kind: TypeKind::Optional(Box::new(wrapped)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Identifier {
        name: String,
        generic_args: Option<Span>,
    },
    Optional(Box<TypeSyntax>),
    /// Function, tuple, array, or any other type syntax.
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
    /// Stored as bits so literal nodes stay hashable.
    Float(u64),
    Bool(bool),
    Str(Vec<StrSegment>),
    /// Reference to a declaration by name.
    Ref(Ident),
    /// `base.member`, or `.member` when `base` is `None`.
    Member {
        base: Option<ExprId>,
        member: Ident,
    },
    Call {
        callee: ExprId,
        args: Vec<CallArg>,
    },
    /// Unfolded operator chain: `operands[0] ops[0] operands[1] ...`.
    Sequence {
        operands: Vec<ExprId>,
        operators: Vec<SequenceOperator>,
    },
    /// Already folded binary expression.
    Infix {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Closure(Block),
    Await(ExprId),
    /// Any expression kind the compiler does not accept.
    Unsupported(String),
}

impl ExprKind {
    pub fn float(value: f64) -> Self {
        ExprKind::Float(value.to_bits())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StrSegment {
    Text(String),
    Interpolation(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallArg {
    pub label: Option<Ident>,
    pub value: ExprId,
    pub span: Span,
}

impl CallArg {
    /// Label text, with `_` for an unlabeled argument.
    pub fn label_text(&self) -> &str {
        self.label.as_ref().map_or("_", |l| l.text.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceOperator {
    pub symbol: String,
    pub span: Span,
}
