//! Integer constant evaluation across schemas

use crate::schema::{revisions, ACTIVE};
use astcompat_ast::ExprNode;
use astcompat_common::ApsInt;

pub mod legacy {
    use astcompat_ast::legacy::LegacyEvaluate;
    use astcompat_ast::ExprNode;
    use astcompat_common::ApsInt;

    pub fn evaluate_as_int(expr: ExprNode<'_>) -> Option<ApsInt> {
        LegacyEvaluate::evaluate_as_int(&expr)
    }
}

pub mod current {
    use astcompat_ast::ExprNode;
    use astcompat_common::ApsInt;
    use log::trace;

    /// Generic evaluation, keeping only integral values
    pub fn evaluate_as_int(expr: ExprNode<'_>) -> Option<ApsInt> {
        if !expr.ty().ty.is_integral_or_enumeration() {
            trace!("{} is not of integral type", expr.kind_name());
            return None;
        }
        let result = expr.evaluate_as_rvalue()?;
        if !result.val.is_int() {
            trace!("{} evaluated to a non-integer value", expr.kind_name());
        }
        result.val.into_int()
    }
}

/// Value of `expr` when it is an integer constant expression
pub fn evaluate_as_int(expr: ExprNode<'_>) -> Option<ApsInt> {
    if ACTIVE.at_least(revisions::EVAL_RESULT) {
        current::evaluate_as_int(expr)
    } else {
        legacy::evaluate_as_int(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astcompat_ast::ast::{BinaryOp, CastKind};
    use astcompat_ast::{samples, AstBuilder, Type};
    use astcompat_common::SourceRange;

    #[test]
    fn test_sum_of_literals() {
        let sample = samples::constants();
        let ctx = &sample.unit.ast;
        let sum = ctx.expr(sample.mark("sum").unwrap());
        assert_eq!(evaluate_as_int(sum).and_then(|v| v.to_i64()), Some(5));
    }

    #[test]
    fn test_mutable_variable_is_absent() {
        let sample = samples::constants();
        let ctx = &sample.unit.ast;
        let mutable = ctx.expr(sample.mark("mutable").unwrap());
        assert_eq!(evaluate_as_int(mutable), None);
        assert_eq!(legacy::evaluate_as_int(mutable), None);
    }

    #[test]
    fn test_const_variable_folds() {
        let sample = samples::constants();
        let ctx = &sample.unit.ast;
        let scaled = ctx.expr(sample.mark("scaled").unwrap());
        assert_eq!(evaluate_as_int(scaled).and_then(|v| v.to_i64()), Some(8));
    }

    #[test]
    fn test_floating_operands() {
        let mut b = AstBuilder::new();
        let half = b.floating_literal(2.5, Type::Double, SourceRange::default());
        let twice = b.binary(BinaryOp::Mul, half, half, Type::Double);
        let truncated = b.implicit_cast(CastKind::FloatingToIntegral, twice, Type::Int);
        let huge = b.floating_literal(1e30, Type::Double, SourceRange::default());
        let overflowing = b.implicit_cast(CastKind::FloatingToIntegral, huge, Type::Long);
        let ctx = b.finish();

        let strategies: [fn(ExprNode<'_>) -> Option<ApsInt>; 2] =
            [legacy::evaluate_as_int, current::evaluate_as_int];
        for strategy in strategies {
            assert_eq!(strategy(ctx.expr(twice)), None);
            assert_eq!(strategy(ctx.expr(truncated)).and_then(|v| v.to_i64()), Some(6));
            assert_eq!(strategy(ctx.expr(overflowing)), None);
        }
    }

    #[test]
    fn test_strategies_agree_on_every_sample_expression() {
        for sample in samples::all_samples() {
            for expr in sample.unit.ast.exprs() {
                assert_eq!(
                    legacy::evaluate_as_int(expr),
                    current::evaluate_as_int(expr),
                    "{:?} in {}",
                    expr,
                    sample.name
                );
            }
        }
    }
}
