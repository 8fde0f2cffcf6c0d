use astcompat_ast::ast::{BinaryOp, CastKind, UnaryOp};
use astcompat_ast::{AstBuilder, ExprId, Type};
use astcompat_common::{SourceLocation, SourceManager, SourceRange};
use astcompat_core::{eval, implicit, ranges};
use proptest::prelude::*;

const MAIN: &str = "#include \"defs.h\"\nint a = SUM(1, 2);\nint b = 4;\n";
const HEADER: &str = "#define SUM(x, y) ((x) + (y))\n";

fn locations() -> (SourceManager, Vec<SourceLocation>) {
    let mut sm = SourceManager::new();
    let main = sm.add_file("main.c", MAIN, SourceLocation::INVALID);
    let include = sm.location(main, 0);
    let header = sm.add_file("defs.h", HEADER, include);
    let call = SourceRange::new(sm.location(main, 26), sm.location(main, 34));
    let spelling = sm.location(header, 18);
    let body = sm.add_expansion(spelling, call, 11, true);
    let x = body.with_offset(2);
    let spelling = sm.location(main, 30);
    let arg = sm.add_expansion(spelling, SourceRange::new(x, x), 1, true);

    let mut locs: Vec<SourceLocation> =
        (0..=MAIN.len() as u32).map(|o| sm.location(main, o)).collect();
    locs.extend((0..=HEADER.len() as u32).map(|o| sm.location(header, o)));
    locs.extend((0..11).map(|o| body.with_offset(o)));
    locs.push(arg);
    locs.push(SourceLocation::INVALID);
    (sm, locs)
}

#[derive(Debug, Clone, Copy)]
enum Wrapper {
    Cleanups,
    Materialize,
    Bind,
    ImplicitCast,
    Paren,
}

fn wrapper() -> impl Strategy<Value = Wrapper> {
    prop_oneof![
        Just(Wrapper::Cleanups),
        Just(Wrapper::Materialize),
        Just(Wrapper::Bind),
        Just(Wrapper::ImplicitCast),
        Just(Wrapper::Paren),
    ]
}

fn wrap(b: &mut AstBuilder, inner: ExprId, wrapper: Wrapper) -> ExprId {
    match wrapper {
        Wrapper::Cleanups => b.expr_with_cleanups(inner),
        Wrapper::Materialize => b.materialize_temporary(inner),
        Wrapper::Bind => b.bind_temporary(inner),
        Wrapper::ImplicitCast => b.implicit_cast(CastKind::NoOp, inner, Type::Int),
        Wrapper::Paren => b.paren(inner, SourceRange::default()),
    }
}

#[derive(Debug, Clone)]
enum Arith {
    Lit(i64, bool),
    Neg(Box<Arith>),
    Bin(BinaryOp, Box<Arith>, Box<Arith>),
}

fn arith() -> impl Strategy<Value = Arith> {
    let leaf = (any::<i64>(), any::<bool>()).prop_map(|(v, unsigned)| Arith::Lit(v, unsigned));
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Arith::Neg(Box::new(e))),
            (
                prop_oneof![
                    Just(BinaryOp::Add),
                    Just(BinaryOp::Sub),
                    Just(BinaryOp::Mul),
                    Just(BinaryOp::Div),
                    Just(BinaryOp::Mod),
                    Just(BinaryOp::LeftShift),
                    Just(BinaryOp::RightShift),
                    Just(BinaryOp::BitXor),
                    Just(BinaryOp::Less),
                    Just(BinaryOp::LogicalOr),
                ],
                inner.clone(),
                inner
            )
                .prop_map(|(op, l, r)| Arith::Bin(op, Box::new(l), Box::new(r))),
        ]
    })
}

/// Build `tree` with 64-bit operands; returns the id and whether it is unsigned
fn build(b: &mut AstBuilder, tree: &Arith) -> (ExprId, bool) {
    match tree {
        Arith::Lit(value, unsigned) => {
            let ty = if *unsigned { Type::UnsignedLong } else { Type::Long };
            (b.integer_literal(*value as u64 as u128, ty, SourceRange::default()), *unsigned)
        }
        Arith::Neg(inner) => {
            let (operand, unsigned) = build(b, inner);
            let ty = if unsigned { Type::UnsignedLong } else { Type::Long };
            (b.unary(UnaryOp::Minus, operand, ty, SourceRange::default()), unsigned)
        }
        Arith::Bin(op, lhs, rhs) => {
            let (l, l_unsigned) = build(b, lhs);
            let (r, r_unsigned) = build(b, rhs);
            if op.is_comparison() || op.is_logical() {
                return (b.binary(*op, l, r, Type::Bool), true);
            }
            let unsigned = l_unsigned || r_unsigned;
            let ty = if unsigned { Type::UnsignedLong } else { Type::Long };
            let l = b.implicit_cast(CastKind::IntegralCast, l, ty.clone());
            let r = b.implicit_cast(CastKind::IntegralCast, r, ty.clone());
            (b.binary(*op, l, r, ty), unsigned)
        }
    }
}

proptest! {
    #[test]
    fn point_within_strategies_agree(p in 0usize..256, s in 0usize..256, e in 0usize..256) {
        let (sm, locs) = locations();
        let (p, s, e) = (locs[p % locs.len()], locs[s % locs.len()], locs[e % locs.len()]);
        prop_assert_eq!(
            ranges::legacy::is_point_within(&sm, p, s, e),
            ranges::current::is_point_within(&sm, p, s, e)
        );
    }

    #[test]
    fn expansion_range_strategies_agree(index in 0usize..256) {
        let (sm, locs) = locations();
        let loc = locs[index % locs.len()];
        prop_assert_eq!(
            ranges::legacy::get_immediate_expansion_range(&sm, loc),
            ranges::current::get_immediate_expansion_range(&sm, loc)
        );
    }

    #[test]
    fn ignore_implicit_strategies_agree(chain in prop::collection::vec(wrapper(), 0..12)) {
        let mut b = AstBuilder::new();
        let mut top = b.integer_literal(7, Type::Int, SourceRange::default());
        for w in &chain {
            top = wrap(&mut b, top, *w);
        }
        let ctx = b.finish();
        let expr = ctx.expr(top);
        let stripped = implicit::current::ignore_implicit(expr);
        prop_assert_eq!(implicit::legacy::ignore_implicit(expr), stripped);
        prop_assert!(!stripped.is_implicit_wrapper());
    }

    #[test]
    fn ignore_implicit_is_idempotent(
        inner in prop::collection::vec(wrapper(), 0..8),
        outer in prop::collection::vec(wrapper(), 0..8),
    ) {
        let mut b = AstBuilder::new();
        let mut top = b.integer_literal(7, Type::Int, SourceRange::default());
        for w in &inner {
            top = wrap(&mut b, top, *w);
        }
        top = b.c_style_cast(CastKind::NoOp, top, Type::Int, SourceRange::default());
        for w in &outer {
            top = wrap(&mut b, top, *w);
        }
        let ctx = b.finish();
        let expr = ctx.expr(top);

        let once = implicit::ignore_implicit(expr);
        prop_assert_eq!(implicit::ignore_implicit(once), once);
        let legacy = implicit::legacy::ignore_implicit(expr);
        prop_assert_eq!(implicit::legacy::ignore_implicit(legacy), legacy);
        let current = implicit::current::ignore_implicit(expr);
        prop_assert_eq!(implicit::current::ignore_implicit(current), current);
    }

    #[test]
    fn evaluation_strategies_agree(tree in arith()) {
        let mut b = AstBuilder::new();
        let (root, _) = build(&mut b, &tree);
        let ctx = b.finish();
        let expr = ctx.expr(root);
        prop_assert_eq!(eval::legacy::evaluate_as_int(expr), eval::current::evaluate_as_int(expr));
    }

    #[test]
    fn small_sums_fold(a in -1000i64..1000, c in -1000i64..1000) {
        let mut b = AstBuilder::new();
        let lhs = b.integer_literal(a as u64 as u128, Type::Long, SourceRange::default());
        let rhs = b.integer_literal(c as u64 as u128, Type::Long, SourceRange::default());
        let sum = b.binary(BinaryOp::Add, lhs, rhs, Type::Long);
        let ctx = b.finish();
        let value = astcompat_core::evaluate_as_int(ctx.expr(sum)).and_then(|v| v.to_i64());
        prop_assert_eq!(value, Some(a + c));
    }
}
