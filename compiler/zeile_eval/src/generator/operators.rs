//! Binary operators.
//!
//! Sema guarantees both operands have the same literal type and the
//! operator applies to it. Integer arithmetic is checked; overflow and
//! division by zero are reported instead of producing a value.

use std::cmp::Ordering;

use zeile_diagnostic::{Diagnostic, DiagnosticId};
use zeile_ir::{fold_sequence, BinaryOp, ExprId, Folded, Span};

use super::IrGenerator;
use crate::{RuntimeObject, Trivial};

impl IrGenerator<'_> {
    pub(super) fn eval_operators(&mut self, id: ExprId) -> Option<RuntimeObject> {
        // Fold failures were reported by sema.
        let folded = fold_sequence(self.unit(), id).ok()?;
        self.eval_folded(&folded)
    }

    fn eval_folded(&mut self, folded: &Folded) -> Option<RuntimeObject> {
        match folded {
            Folded::Leaf(id) => self.eval_expr(*id, None),
            Folded::Binary {
                op,
                op_span,
                lhs,
                rhs,
                ..
            } => {
                let lhs = self.eval_folded(lhs)?;
                if op.is_logical() {
                    let left = lhs.as_bool()?;
                    // Short-circuit.
                    if (*op == BinaryOp::And && !left) || (*op == BinaryOp::Or && left) {
                        return Some(RuntimeObject::bool(left));
                    }
                    let right = self.eval_folded(rhs)?.as_bool()?;
                    return Some(RuntimeObject::bool(right));
                }
                let rhs = self.eval_folded(rhs)?;
                self.apply_binary(*op, *op_span, &lhs, &rhs)
            }
        }
    }

    fn apply_binary(
        &mut self,
        op: BinaryOp,
        span: Span,
        lhs: &RuntimeObject,
        rhs: &RuntimeObject,
    ) -> Option<RuntimeObject> {
        match op {
            BinaryOp::Eq => return Some(RuntimeObject::bool(lhs == rhs)),
            BinaryOp::NotEq => return Some(RuntimeObject::bool(lhs != rhs)),
            _ => {}
        }
        match (lhs.value()?, rhs.value()?) {
            (Trivial::Int(a), Trivial::Int(b)) => self.int_binary(op, span, *a, *b),
            (Trivial::Float(a), Trivial::Float(b)) => self.float_binary(op, span, *a, *b),
            (Trivial::String(a), Trivial::String(b)) => {
                if op == BinaryOp::Add {
                    Some(RuntimeObject::string(format!("{a}{b}")))
                } else {
                    compare(op, Some(a.cmp(b)))
                }
            }
            _ => None,
        }
    }

    fn int_binary(&mut self, op: BinaryOp, span: Span, a: i64, b: i64) -> Option<RuntimeObject> {
        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div | BinaryOp::Rem if b == 0 => {
                self.report_division_by_zero(span);
                return None;
            }
            BinaryOp::Div => a.checked_div(b),
            BinaryOp::Rem => a.checked_rem(b),
            _ => return compare(op, Some(a.cmp(&b))),
        };
        if result.is_none() {
            self.report(
                Diagnostic::new(DiagnosticId::IntegerOverflow)
                    .with_args(&[op.as_symbol()])
                    .with_label(span, ""),
            );
        }
        result.map(RuntimeObject::int)
    }

    fn float_binary(&mut self, op: BinaryOp, span: Span, a: f64, b: f64) -> Option<RuntimeObject> {
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div | BinaryOp::Rem if b == 0.0 => {
                self.report_division_by_zero(span);
                return None;
            }
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => return compare(op, a.partial_cmp(&b)),
        };
        Some(RuntimeObject::float(result))
    }

    fn report_division_by_zero(&mut self, span: Span) {
        self.report(Diagnostic::new(DiagnosticId::DivisionByZero).with_label(span, ""));
    }
}

/// Result of an ordering comparison. Unordered operands (NaN) compare
/// false.
fn compare(op: BinaryOp, ordering: Option<Ordering>) -> Option<RuntimeObject> {
    let Some(ordering) = ordering else {
        return Some(RuntimeObject::bool(false));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => return None,
    };
    Some(RuntimeObject::bool(result))
}
