//! Programmatic construction of source units.
//!
//! Used for the standard library unit and throughout the test suites.
//! Parsers that produce real spans push fully formed nodes through
//! [`UnitBuilder::push_expr`] and [`UnitBuilder::push_decl`].

use crate::{DeclId, ExprId, Span};

use super::{
    BinaryOp, Block, Binding, CallArg, Decl, DeclKind, EnumCaseDecl, EnumCaseElement, EnumDecl,
    Expr, ExprKind, FunctionDecl, Ident, Item, ItemKind, ParseIssue, Pattern, SequenceOperator,
    Shebang, SourceUnit, StrSegment, StructDecl, TypeSyntax, VariableDecl,
};

/// Incrementally builds a [`SourceUnit`].
#[derive(Debug, Default)]
pub struct UnitBuilder {
    unit: SourceUnit,
}

impl UnitBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        UnitBuilder {
            unit: SourceUnit {
                name: name.into(),
                ..SourceUnit::default()
            },
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.unit.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_shebang(mut self, text: impl Into<String>) -> Self {
        self.unit.shebang = Some(Shebang {
            text: text.into(),
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_parse_issue(mut self, message: impl Into<String>, span: Span) -> Self {
        self.unit.parse_issues.push(ParseIssue {
            message: message.into(),
            span,
        });
        self
    }

    /// Append an already formed expression to the arena.
    pub fn push_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.unit.exprs.len()).unwrap_or(u32::MAX));
        self.unit.exprs.push(expr);
        id
    }

    /// Append an already formed declaration to the arena.
    pub fn push_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(u32::try_from(self.unit.decls.len()).unwrap_or(u32::MAX));
        self.unit.decls.push(decl);
        id
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.push_expr(Expr {
            kind,
            span: Span::DUMMY,
        })
    }

    // -- Expressions --

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::float(value))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value))
    }

    /// Plain string literal without interpolation.
    pub fn string(&mut self, text: &str) -> ExprId {
        self.expr(ExprKind::Str(vec![StrSegment::Text(text.to_owned())]))
    }

    pub fn interpolated(&mut self, segments: Vec<StrSegment>) -> ExprId {
        self.expr(ExprKind::Str(segments))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.expr(ExprKind::Ref(Ident::synthetic(name)))
    }

    pub fn member(&mut self, base: ExprId, name: &str) -> ExprId {
        self.expr(ExprKind::Member {
            base: Some(base),
            member: Ident::synthetic(name),
        })
    }

    /// `.name` with the base left to inference.
    pub fn implicit_member(&mut self, name: &str) -> ExprId {
        self.expr(ExprKind::Member {
            base: None,
            member: Ident::synthetic(name),
        })
    }

    /// Call with `(label, value)` arguments; `None` or `"_"` means unlabeled.
    pub fn call(&mut self, callee: ExprId, args: &[(Option<&str>, ExprId)]) -> ExprId {
        let args = args
            .iter()
            .map(|&(label, value)| CallArg {
                label: label.filter(|l| *l != "_").map(Ident::synthetic),
                value,
                span: Span::DUMMY,
            })
            .collect();
        self.expr(ExprKind::Call { callee, args })
    }

    /// Shorthand for calling a name: `name(args...)`.
    pub fn call_named(&mut self, name: &str, args: &[(Option<&str>, ExprId)]) -> ExprId {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    pub fn sequence(&mut self, operands: Vec<ExprId>, operators: &[&str]) -> ExprId {
        let operators = operators
            .iter()
            .map(|symbol| SequenceOperator {
                symbol: (*symbol).to_owned(),
                span: Span::DUMMY,
            })
            .collect();
        self.expr(ExprKind::Sequence {
            operands,
            operators,
        })
    }

    pub fn infix(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Infix { op, lhs, rhs })
    }

    pub fn closure(&mut self, items: Vec<Item>) -> ExprId {
        self.expr(ExprKind::Closure(Block {
            items,
            span: Span::DUMMY,
        }))
    }

    pub fn await_expr(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Await(inner))
    }

    pub fn unsupported(&mut self, kind: &str) -> ExprId {
        self.expr(ExprKind::Unsupported(kind.to_owned()))
    }

    // -- Declarations --

    pub fn struct_decl(&mut self, name: &str, members: Vec<DeclId>) -> DeclId {
        let mut decl = StructDecl::new(name);
        decl.members = members;
        self.push_decl(Decl::new(DeclKind::Struct(decl)))
    }

    /// `enum name { case a, b, ... }` with one case declaration per name.
    pub fn enum_decl(&mut self, name: &str, cases: &[&str]) -> DeclId {
        let members = cases
            .iter()
            .map(|case| {
                self.push_decl(Decl::new(DeclKind::EnumCase(EnumCaseDecl {
                    elements: vec![EnumCaseElement::named(*case)],
                })))
            })
            .collect();
        let mut decl = EnumDecl::new(name);
        decl.members = members;
        self.push_decl(Decl::new(DeclKind::Enum(decl)))
    }

    pub fn function(&mut self, function: FunctionDecl) -> DeclId {
        self.push_decl(Decl::new(DeclKind::Function(function)))
    }

    /// `static func ...`
    pub fn static_function(&mut self, function: FunctionDecl) -> DeclId {
        self.push_decl(Decl::new(DeclKind::Function(function)).with_modifier("static"))
    }

    /// `let name[: annotation] [= initializer]`
    pub fn let_decl(
        &mut self,
        name: &str,
        annotation: Option<&str>,
        initializer: Option<ExprId>,
    ) -> DeclId {
        self.push_decl(Decl::new(DeclKind::Variable(VariableDecl {
            specifier: Ident::synthetic("let"),
            bindings: vec![Binding {
                pattern: Pattern::Identifier(Ident::synthetic(name)),
                annotation: annotation.map(TypeSyntax::named),
                initializer,
                span: Span::DUMMY,
            }],
        })))
    }

    // -- Top-level items --

    pub fn item_decl(&mut self, id: DeclId) -> &mut Self {
        self.unit.block.items.push(Item::decl(id));
        self
    }

    pub fn item_expr(&mut self, id: ExprId) -> &mut Self {
        self.unit.block.items.push(Item::expr(id));
        self
    }

    pub fn item_stmt(&mut self, keyword: &str) -> &mut Self {
        self.unit.block.items.push(Item {
            kind: ItemKind::Stmt(keyword.to_owned()),
            span: Span::DUMMY,
        });
        self
    }

    pub fn item_unrecognized(&mut self) -> &mut Self {
        self.unit.block.items.push(Item {
            kind: ItemKind::Unrecognized,
            span: Span::DUMMY,
        });
        self
    }

    pub fn push_item(&mut self, item: Item) -> &mut Self {
        self.unit.block.items.push(item);
        self
    }

    pub fn finish(self) -> SourceUnit {
        self.unit
    }
}
