//! Binary operators and operator-precedence folding of sequence expressions.

use crate::{ExprId, Span};

use super::{ExprKind, SequenceOperator, SourceUnit};

/// Binary operators accepted in story scripts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "&&" => Self::And,
            "||" => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; higher binds tighter. All operators are
    /// left-associative.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Rem => 5,
            Self::Add | Self::Sub => 4,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem
        )
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// A binary expression tree produced by folding.
///
/// Folding never touches the arena: leaves point at the original operand
/// expressions, so both semantic analysis and evaluation can fold the same
/// sequence and get the same tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Folded {
    Leaf(ExprId),
    Binary {
        op: BinaryOp,
        op_span: Span,
        lhs: Box<Folded>,
        rhs: Box<Folded>,
        span: Span,
    },
}

impl Folded {
    pub fn span(&self, unit: &SourceUnit) -> Span {
        match self {
            Folded::Leaf(id) => unit.expr(*id).span,
            Folded::Binary { span, .. } => *span,
        }
    }
}

/// Why a sequence could not be folded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FoldError {
    /// An operator symbol with no known precedence.
    UnknownOperator { symbol: String, span: Span },
    /// Operand and operator counts do not interleave.
    Malformed { span: Span },
}

/// Fold a sequence or infix expression into a binary tree.
///
/// Any other expression folds to a single leaf.
pub fn fold_sequence(unit: &SourceUnit, id: ExprId) -> Result<Folded, FoldError> {
    let expr = unit.expr(id);
    match &expr.kind {
        ExprKind::Sequence {
            operands,
            operators,
        } => {
            if operands.is_empty() || operators.len() + 1 != operands.len() {
                return Err(FoldError::Malformed { span: expr.span });
            }
            let mut ops = Vec::with_capacity(operators.len());
            for operator in operators {
                ops.push(resolve_operator(operator)?);
            }
            let mut folder = Folder {
                unit,
                operands,
                ops: &ops,
                next: 0,
            };
            let lhs = folder.operand(0);
            Ok(folder.climb(lhs, 0))
        }
        ExprKind::Infix { op, lhs, rhs } => Ok(Folded::Binary {
            op: *op,
            op_span: expr.span,
            lhs: Box::new(Folded::Leaf(*lhs)),
            rhs: Box::new(Folded::Leaf(*rhs)),
            span: expr.span,
        }),
        _ => Ok(Folded::Leaf(id)),
    }
}

fn resolve_operator(operator: &SequenceOperator) -> Result<(BinaryOp, Span), FoldError> {
    BinaryOp::from_symbol(&operator.symbol)
        .map(|op| (op, operator.span))
        .ok_or_else(|| FoldError::UnknownOperator {
            symbol: operator.symbol.clone(),
            span: operator.span,
        })
}

/// Precedence climbing over pre-validated operands and operators.
struct Folder<'a> {
    unit: &'a SourceUnit,
    operands: &'a [ExprId],
    ops: &'a [(BinaryOp, Span)],
    /// Index of the next unconsumed operator.
    next: usize,
}

impl Folder<'_> {
    fn operand(&self, index: usize) -> Folded {
        Folded::Leaf(self.operands[index])
    }

    fn climb(&mut self, mut lhs: Folded, min_precedence: u8) -> Folded {
        while let Some(&(op, op_span)) = self.ops.get(self.next) {
            if op.precedence() < min_precedence {
                break;
            }
            self.next += 1;
            let mut rhs = self.operand(self.next);
            while let Some(&(lookahead, _)) = self.ops.get(self.next) {
                if lookahead.precedence() <= op.precedence() {
                    break;
                }
                rhs = self.climb(rhs, op.precedence() + 1);
            }
            let span = lhs.span(self.unit).merge(rhs.span(self.unit));
            lhs = Folded::Binary {
                op,
                op_span,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        lhs
    }
}
