use astcompat_ast::ast::CastKind;
use astcompat_ast::{samples, AstBuilder, Located, Type};
use astcompat_common::SourceRange;
use astcompat_core::{get_sub_expr_as_written, ignore_implicit, ContractViolation};
use pretty_assertions::assert_eq;

#[test]
fn constructor_conversion_yields_constructor_argument() {
    let sample = samples::flag_conversions();
    let ctx = &sample.unit.ast;
    let cast = ctx.expr(sample.mark("constructor-conversion").unwrap()).as_cast().unwrap();
    let argument = ctx.expr(sample.mark("argument").unwrap());

    let written = get_sub_expr_as_written(cast).unwrap();
    assert_eq!(written, argument);
    assert_eq!(sample.unit.describe(written.begin_loc()), "flag.cxx:7:10");
}

#[test]
fn bool_conversion_yields_receiver() {
    let sample = samples::flag_conversions();
    let ctx = &sample.unit.ast;
    let cast = ctx.expr(sample.mark("bool-conversion").unwrap()).as_cast().unwrap();
    let receiver = ctx.expr(sample.mark("receiver").unwrap());

    assert_eq!(get_sub_expr_as_written(cast), Ok(receiver));
}

#[test]
fn written_cast_under_full_expression() {
    let sample = samples::user_conversion();
    let ctx = &sample.unit.ast;
    let full = ctx.expr(sample.mark("full-expression").unwrap());
    let written = ctx.expr(sample.mark("written").unwrap());

    let cast = ignore_implicit(full).as_cast().unwrap();
    assert!(!cast.is_implicit());
    assert_eq!(get_sub_expr_as_written(cast), Ok(written));
}

#[test]
fn nested_implicit_casts_are_followed() {
    let mut b = AstBuilder::new();
    let lit = b.integer_literal(3, Type::Short, SourceRange::default());
    let promoted = b.implicit_cast(CastKind::IntegralCast, lit, Type::Int);
    let widened = b.implicit_cast(CastKind::IntegralCast, promoted, Type::Long);
    let ctx = b.finish();

    let cast = ctx.expr(widened).as_cast().unwrap();
    assert_eq!(get_sub_expr_as_written(cast), Ok(ctx.expr(lit)));
}

#[test]
fn user_defined_conversion_of_literal_is_rejected() {
    let mut b = AstBuilder::new();
    let lit = b.integer_literal(3, Type::Int, SourceRange::default());
    let cast = b.implicit_cast(CastKind::UserDefinedConversion, lit, Type::Bool);
    let ctx = b.finish();

    let cast = ctx.expr(cast).as_cast().unwrap();
    let err = get_sub_expr_as_written(cast).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::UnexpectedConversionOperand {
            found: "IntegerLiteral"
        }
    );
    let compat: astcompat_common::CompatError = err.into();
    assert!(compat.to_string().contains("get_sub_expr_as_written"));
}

#[test]
fn every_sample_cast_recovers() {
    for sample in samples::all_samples() {
        for expr in sample.unit.ast.exprs() {
            if let Some(cast) = expr.as_cast() {
                assert!(
                    get_sub_expr_as_written(cast).is_ok(),
                    "{} in {}",
                    expr.kind_name(),
                    sample.name
                );
            }
        }
    }
}
