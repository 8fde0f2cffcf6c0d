//! Recovery of the operand a programmer wrote under a conversion
//!
//! Implicit conversions through converting constructors and conversion
//! functions leave several synthetic nodes between a cast and what was written:
//! temporaries, the construct expression, the member call of the conversion
//! function. `get_sub_expr_as_written` walks back through them.

use crate::error::ContractViolation;
use astcompat_ast::{CastKind, CastNode, ExprKind, ExprNode};
use log::trace;

/// Skip one materialized temporary and then one temporary binding, if present
pub fn skip_implicit_temporary(expr: ExprNode<'_>) -> ExprNode<'_> {
    let mut expr = expr;
    if let ExprKind::MaterializeTemporary { .. } = expr.kind() {
        if let Some(sub) = expr.sub_expr() {
            expr = sub;
        }
    }
    if let ExprKind::BindTemporary { .. } = expr.kind() {
        if let Some(sub) = expr.sub_expr() {
            expr = sub;
        }
    }
    expr
}

/// The operand of `cast` as it appears in the source.
///
/// Fails only when the tree breaks the shape the host guarantees for
/// constructor and user-defined conversions.
pub fn get_sub_expr_as_written(cast: CastNode<'_>) -> Result<ExprNode<'_>, ContractViolation> {
    let mut cast = cast;
    loop {
        let mut sub = skip_implicit_temporary(cast.sub_expr());
        match cast.cast_kind() {
            CastKind::ConstructorConversion => {
                let construct = sub
                    .as_construct()
                    .ok_or(ContractViolation::ExpectedConstructExpr {
                        found: sub.kind_name(),
                    })?;
                let argument = construct
                    .arg(0)
                    .ok_or(ContractViolation::MissingConstructorArgument)?;
                trace!(
                    "constructor conversion: taking argument of {}",
                    construct.constructor().name()
                );
                sub = skip_implicit_temporary(argument);
            }
            CastKind::UserDefinedConversion => {
                if let Some(call) = sub.as_member_call() {
                    sub = call
                        .implicit_object_argument()
                        .ok_or(ContractViolation::MissingImplicitObject)?;
                    trace!("user-defined conversion: taking object of member call");
                } else if !sub.is_block() {
                    return Err(ContractViolation::UnexpectedConversionOperand {
                        found: sub.kind_name(),
                    });
                }
            }
            _ => {}
        }
        match sub.as_implicit_cast() {
            Some(next) => cast = next,
            None => return Ok(sub),
        }
    }
}
