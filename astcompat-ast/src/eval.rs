//! Constant folding over the elaborated tree
//!
//! Follows the host's rules for integral constant expressions: signed overflow,
//! division by zero and out-of-range shifts are not constant, unsigned
//! arithmetic wraps, and a variable contributes its value only when it is a
//! `const` variable of arithmetic type with a constant initializer.

use crate::ast::{BinaryOp, CastKind, DeclId, DeclKind, ExprKind, UnaryOp};
use crate::handle::ExprNode;
use crate::types::Type;
use astcompat_common::ApsInt;
use log::trace;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

/// Nesting limit for expressions and variable initializers
const MAX_EVAL_DEPTH: usize = 256;

/// Value of a folded expression
#[derive(Debug, Clone, PartialEq)]
pub enum APValue {
    Uninit,
    Int(ApsInt),
    Float(f64),
    /// Address of a declared object, or of an unnamed object such as a string literal
    LValue { base: Option<DeclId> },
}

impl APValue {
    pub fn is_int(&self) -> bool {
        matches!(self, APValue::Int(_))
    }

    pub fn as_int(&self) -> Option<&ApsInt> {
        match self {
            APValue::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<ApsInt> {
        match self {
            APValue::Int(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of a successful evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    pub val: APValue,
    pub has_side_effects: bool,
}

impl<'a> ExprNode<'a> {
    /// Fold the expression to a value of any type
    pub fn evaluate_as_rvalue(self) -> Option<EvalResult> {
        let mut evaluator = Evaluator { depth: 0 };
        let val = evaluator.eval_rvalue(self)?;
        Some(EvalResult {
            val,
            has_side_effects: false,
        })
    }

    /// Fold an expression of integral or enumeration type
    pub fn evaluate_as_int(self) -> Option<EvalResult> {
        if !self.ty().ty.is_integral_or_enumeration() {
            trace!("{} is not of integral type", self.kind_name());
            return None;
        }
        let mut evaluator = Evaluator { depth: 0 };
        let value = evaluator.eval_int(self)?;
        Some(EvalResult {
            val: APValue::Int(value),
            has_side_effects: false,
        })
    }
}

struct Evaluator {
    depth: usize,
}

impl Evaluator {
    fn eval_rvalue(&mut self, expr: ExprNode<'_>) -> Option<APValue> {
        match self.eval(expr)? {
            APValue::LValue { base: Some(decl) } => self.read_variable(expr, decl),
            value => Some(value),
        }
    }

    fn eval(&mut self, expr: ExprNode<'_>) -> Option<APValue> {
        self.nested(|this| this.eval_inner(expr))
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Option<APValue>) -> Option<APValue> {
        if self.depth >= MAX_EVAL_DEPTH {
            trace!("evaluation nesting limit reached");
            return None;
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    fn eval_inner(&mut self, expr: ExprNode<'_>) -> Option<APValue> {
        let ctx = expr.context();
        let ty = &expr.ty().ty;
        match expr.kind() {
            ExprKind::IntegerLiteral(value) => {
                let width = ty.int_width()?;
                Some(APValue::Int(ApsInt::new(*value, width, ty.is_unsigned_integer())))
            }
            ExprKind::CharacterLiteral(value) => {
                let width = ty.int_width()?;
                Some(APValue::Int(ApsInt::new(*value, width, ty.is_unsigned_integer())))
            }
            ExprKind::BoolLiteral(value) => {
                let width = ty.int_width().unwrap_or(1);
                Some(APValue::Int(ApsInt::new(u8::from(*value), width, ty.is_unsigned_integer())))
            }
            ExprKind::FloatingLiteral(value) => Some(APValue::Float(*value)),
            ExprKind::StringLiteral(_) => Some(APValue::LValue { base: None }),

            ExprKind::DeclRef(decl) => match &ctx[*decl].kind {
                DeclKind::EnumConstant { value } => Some(APValue::Int(match ty.int_width() {
                    Some(width) => value.convert(width, ty.is_unsigned_integer()),
                    None => value.clone(),
                })),
                DeclKind::Var { .. } | DeclKind::ParmVar { .. } | DeclKind::Function { .. } => {
                    Some(APValue::LValue { base: Some(*decl) })
                }
                _ => None,
            },

            ExprKind::Paren(_)
            | ExprKind::ExprWithCleanups { .. }
            | ExprKind::MaterializeTemporary { .. }
            | ExprKind::BindTemporary { .. } => self.eval(expr.sub_expr()?),

            ExprKind::Unary { op, operand } => {
                let operand = self.eval_rvalue(ctx.expr(*operand))?;
                eval_unary(*op, operand, ty)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                self.eval_binary(*op, ctx.expr(*lhs), ctx.expr(*rhs), ty)
            }

            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond = self.eval_rvalue(ctx.expr(*cond))?;
                if truthiness(&cond)? {
                    self.eval(ctx.expr(*then_expr))
                } else {
                    self.eval(ctx.expr(*else_expr))
                }
            }

            ExprKind::ImplicitCast { kind, sub }
            | ExprKind::StaticCast { kind, sub }
            | ExprKind::CStyleCast { kind, sub }
            | ExprKind::FunctionalCast { kind, sub } => self.eval_cast(*kind, ctx.expr(*sub), ty),

            ExprKind::Member { .. }
            | ExprKind::Call { .. }
            | ExprKind::MemberCall { .. }
            | ExprKind::Construct { .. }
            | ExprKind::Block { .. } => {
                trace!("{} is not foldable", expr.kind_name());
                None
            }
        }
    }

    /// Load the value of a `const` arithmetic variable from its initializer
    fn read_variable(&mut self, expr: ExprNode<'_>, decl: DeclId) -> Option<APValue> {
        let ctx = expr.context();
        match &ctx[decl].kind {
            DeclKind::Var { ty, init: Some(init) }
                if ty.is_const && (ty.ty.is_integral_or_enumeration() || ty.ty.is_floating()) =>
            {
                let init = ctx.expr(*init);
                self.nested(|this| this.eval_rvalue(init))
            }
            _ => {
                trace!("'{}' is not a constant variable", ctx[decl].name.name);
                None
            }
        }
    }

    fn eval_cast(&mut self, kind: CastKind, sub: ExprNode<'_>, dest: &Type) -> Option<APValue> {
        match kind {
            CastKind::NoOp => self.eval(sub),
            CastKind::LValueToRValue => self.eval_rvalue(sub),
            CastKind::IntegralCast => {
                let value = self.eval_int(sub)?;
                let width = dest.int_width()?;
                Some(APValue::Int(value.convert(width, dest.is_unsigned_integer())))
            }
            CastKind::IntegralToBoolean | CastKind::FloatingToBoolean => {
                let value = self.eval_rvalue(sub)?;
                bool_value(truthiness(&value)?, dest)
            }
            CastKind::IntegralToFloating => {
                let value = self.eval_int(sub)?.to_f64()?;
                Some(APValue::Float(round_to(value, dest)))
            }
            CastKind::FloatingToIntegral => match self.eval_rvalue(sub)? {
                APValue::Float(value) => float_to_int(value, dest).map(APValue::Int),
                _ => None,
            },
            CastKind::FloatingCast => match self.eval_rvalue(sub)? {
                APValue::Float(value) => Some(APValue::Float(round_to(value, dest))),
                _ => None,
            },
            _ => {
                trace!("cast kind {} is not foldable", kind);
                None
            }
        }
    }

    fn eval_int(&mut self, expr: ExprNode<'_>) -> Option<ApsInt> {
        self.eval_rvalue(expr)?.into_int()
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprNode<'_>,
        rhs: ExprNode<'_>,
        result_ty: &Type,
    ) -> Option<APValue> {
        match op {
            BinaryOp::Comma => {
                self.eval_rvalue(lhs)?;
                self.eval(rhs)
            }
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                let left = truthiness(&self.eval_rvalue(lhs)?)?;
                let short_circuit = (op == BinaryOp::LogicalOr) == left;
                let result = if short_circuit {
                    left
                } else {
                    truthiness(&self.eval_rvalue(rhs)?)?
                };
                bool_value(result, result_ty)
            }
            _ if op.is_assignment() || op.is_ptr_mem() => {
                trace!("operator {} is not foldable", op);
                None
            }
            _ => {
                let left = self.eval_rvalue(lhs)?;
                let right = self.eval_rvalue(rhs)?;
                match (left, right) {
                    (APValue::Int(l), APValue::Int(r)) => eval_int_binary(op, l, r, result_ty),
                    (APValue::Float(l), APValue::Float(r)) => {
                        eval_float_binary(op, l, r, result_ty)
                    }
                    _ => None,
                }
            }
        }
    }
}

fn truthiness(value: &APValue) -> Option<bool> {
    match value {
        APValue::Int(value) => Some(!value.is_zero()),
        APValue::Float(value) => Some(*value != 0.0),
        APValue::LValue { .. } => Some(true),
        APValue::Uninit => None,
    }
}

fn bool_value(value: bool, ty: &Type) -> Option<APValue> {
    let width = ty.int_width()?;
    Some(APValue::Int(ApsInt::new(u8::from(value), width, ty.is_unsigned_integer())))
}

fn round_to(value: f64, ty: &Type) -> f64 {
    match ty {
        Type::Float => value as f32 as f64,
        _ => value,
    }
}

fn float_to_int(value: f64, ty: &Type) -> Option<ApsInt> {
    if !value.is_finite() {
        return None;
    }
    let truncated = BigInt::from_f64(value.trunc())?;
    ApsInt::checked(truncated, ty.int_width()?, ty.is_unsigned_integer())
}

fn eval_unary(op: UnaryOp, operand: APValue, result_ty: &Type) -> Option<APValue> {
    match (op, operand) {
        (UnaryOp::Plus, value @ (APValue::Int(_) | APValue::Float(_))) => Some(value),
        (UnaryOp::Minus, APValue::Float(value)) => Some(APValue::Float(-value)),
        (UnaryOp::Minus, APValue::Int(value)) => {
            let (width, unsigned) = (value.bit_width(), value.is_unsigned());
            if unsigned {
                Some(APValue::Int(ApsInt::new(-value.value(), width, true)))
            } else {
                ApsInt::checked(-value.value(), width, false).map(APValue::Int)
            }
        }
        // ~v == -v - 1 in two's complement, at any width
        (UnaryOp::BitNot, APValue::Int(value)) => Some(APValue::Int(ApsInt::new(
            -value.value() - BigInt::one(),
            value.bit_width(),
            value.is_unsigned(),
        ))),
        (UnaryOp::LogicalNot, value) => bool_value(!truthiness(&value)?, result_ty),
        _ => None,
    }
}

fn eval_int_binary(op: BinaryOp, lhs: ApsInt, rhs: ApsInt, result_ty: &Type) -> Option<APValue> {
    if op.is_comparison() {
        let ordering = lhs.value().cmp(rhs.value());
        let result = match op {
            BinaryOp::Equal => ordering.is_eq(),
            BinaryOp::NotEqual => ordering.is_ne(),
            BinaryOp::Less => ordering.is_lt(),
            BinaryOp::Greater => ordering.is_gt(),
            BinaryOp::LessEqual => ordering.is_le(),
            _ => ordering.is_ge(),
        };
        return bool_value(result, result_ty);
    }

    let width = result_ty.int_width()?;
    let unsigned = result_ty.is_unsigned_integer();

    if matches!(op, BinaryOp::LeftShift | BinaryOp::RightShift) {
        return eval_shift(op, lhs.convert(width, unsigned), rhs).map(APValue::Int);
    }

    let lhs = lhs.convert(width, unsigned);
    let rhs = rhs.convert(width, unsigned);
    let (a, b) = (lhs.value(), rhs.value());
    let divides = matches!(op, BinaryOp::Div | BinaryOp::Mod);
    if divides && b.is_zero() {
        trace!("division by zero in {} {} {}", a, op, b);
        return None;
    }
    // a % b is only defined when a / b is representable
    if divides && !unsigned && !ApsInt::fits(&(a / b), width, false) {
        trace!("signed overflow in {} {} {}", a, op, b);
        return None;
    }
    let exact = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return None,
    };
    if unsigned {
        return Some(APValue::Int(ApsInt::new(exact, width, true)));
    }
    match ApsInt::checked(exact, width, false) {
        Some(result) => Some(APValue::Int(result)),
        None => {
            trace!("signed overflow in {} {} {}", a, op, b);
            None
        }
    }
}

fn eval_shift(op: BinaryOp, lhs: ApsInt, rhs: ApsInt) -> Option<ApsInt> {
    let width = lhs.bit_width();
    let count = rhs.value().to_u32().filter(|count| *count < width);
    let Some(count) = count else {
        trace!("shift count {} out of range for width {}", rhs, width);
        return None;
    };
    let count = count as usize;
    let unsigned = lhs.is_unsigned();
    if op == BinaryOp::RightShift {
        // arithmetic for negative values: BigInt shifts round toward negative infinity
        return Some(ApsInt::new(lhs.value() >> count, width, unsigned));
    }
    if unsigned {
        return Some(ApsInt::new(lhs.value() << count, width, true));
    }
    if lhs.value().is_negative() {
        trace!("left shift of negative value {}", lhs);
        return None;
    }
    ApsInt::checked(lhs.value() << count, width, false)
}

fn eval_float_binary(op: BinaryOp, lhs: f64, rhs: f64, result_ty: &Type) -> Option<APValue> {
    let value = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => lhs / rhs,
        BinaryOp::Equal => return bool_value(lhs == rhs, result_ty),
        BinaryOp::NotEqual => return bool_value(lhs != rhs, result_ty),
        BinaryOp::Less => return bool_value(lhs < rhs, result_ty),
        BinaryOp::Greater => return bool_value(lhs > rhs, result_ty),
        BinaryOp::LessEqual => return bool_value(lhs <= rhs, result_ty),
        BinaryOp::GreaterEqual => return bool_value(lhs >= rhs, result_ty),
        _ => return None,
    };
    if value.is_finite() {
        Some(APValue::Float(round_to(value, result_ty)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AstBuilder;
    use crate::context::AstContext;
    use crate::types::QualType;
    use astcompat_common::SourceRange;

    fn int_value(ctx: &AstContext, id: crate::ast::ExprId) -> Option<i128> {
        ctx.expr(id)
            .evaluate_as_int()
            .and_then(|result| result.val.into_int())
            .and_then(|value| value.to_i128())
    }

    #[test]
    fn test_fold_addition() {
        let mut b = AstBuilder::new();
        let two = b.integer_literal(2, Type::Int, SourceRange::default());
        let three = b.integer_literal(3, Type::Int, SourceRange::default());
        let sum = b.binary(BinaryOp::Add, two, three, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, sum), Some(5));
    }

    #[test]
    fn test_signed_overflow_is_not_constant() {
        let mut b = AstBuilder::new();
        let max = b.integer_literal(i32::MAX as u128, Type::Int, SourceRange::default());
        let one = b.integer_literal(1, Type::Int, SourceRange::default());
        let sum = b.binary(BinaryOp::Add, max, one, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, sum), None);
    }

    #[test]
    fn test_unsigned_arithmetic_wraps() {
        let mut b = AstBuilder::new();
        let zero = b.integer_literal(0, Type::UnsignedInt, SourceRange::default());
        let one = b.integer_literal(1, Type::UnsignedInt, SourceRange::default());
        let diff = b.binary(BinaryOp::Sub, zero, one, Type::UnsignedInt);
        let ctx = b.finish();
        let value = ctx.expr(diff).evaluate_as_int().and_then(|r| r.val.into_int());
        assert_eq!(value.and_then(|v| v.to_i128()), Some(u32::MAX as i128));
    }

    #[test]
    fn test_division_by_zero_is_not_constant() {
        let mut b = AstBuilder::new();
        let one = b.integer_literal(1, Type::Int, SourceRange::default());
        let zero = b.integer_literal(0, Type::Int, SourceRange::default());
        let quotient = b.binary(BinaryOp::Div, one, zero, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, quotient), None);
    }

    #[test]
    fn test_min_divided_by_minus_one_is_not_constant() {
        let mut b = AstBuilder::new();
        let magnitude = b.integer_literal(1 << 31, Type::LongLong, SourceRange::default());
        let negated = b.unary(UnaryOp::Minus, magnitude, Type::LongLong, SourceRange::default());
        let min = b.implicit_cast(CastKind::IntegralCast, negated, Type::Int);
        let one = b.integer_literal(1, Type::Int, SourceRange::default());
        let minus_one = b.unary(UnaryOp::Minus, one, Type::Int, SourceRange::default());
        let quotient = b.binary(BinaryOp::Div, min, minus_one, Type::Int);
        let remainder = b.binary(BinaryOp::Mod, min, minus_one, Type::Int);
        let two = b.integer_literal(2, Type::Int, SourceRange::default());
        let even = b.binary(BinaryOp::Mod, min, two, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, min), Some(i32::MIN as i128));
        assert_eq!(int_value(&ctx, quotient), None);
        assert_eq!(int_value(&ctx, remainder), None);
        assert_eq!(int_value(&ctx, even), Some(0));
    }

    #[test]
    fn test_remainder_takes_sign_of_dividend() {
        let mut b = AstBuilder::new();
        let seven = b.integer_literal(7, Type::Int, SourceRange::default());
        let negated = b.unary(UnaryOp::Minus, seven, Type::Int, SourceRange::default());
        let two = b.integer_literal(2, Type::Int, SourceRange::default());
        let remainder = b.binary(BinaryOp::Mod, negated, two, Type::Int);
        let quotient = b.binary(BinaryOp::Div, negated, two, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, remainder), Some(-1));
        assert_eq!(int_value(&ctx, quotient), Some(-3));
    }

    #[test]
    fn test_int128_arithmetic() {
        let mut b = AstBuilder::new();
        let max = b.integer_literal(u128::MAX, Type::UnsignedInt128, SourceRange::default());
        let one = b.integer_literal(1, Type::UnsignedInt128, SourceRange::default());
        let wrapped = b.binary(BinaryOp::Add, max, one, Type::UnsignedInt128);
        let inverted = b.unary(UnaryOp::BitNot, one, Type::UnsignedInt128, SourceRange::default());
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, wrapped), Some(0));
        let value = ctx.expr(inverted).evaluate_as_int().and_then(|r| r.val.into_int());
        assert_eq!(value.map(|v| v.to_string()), Some((u128::MAX - 1).to_string()));
    }

    #[test]
    fn test_shift_out_of_range() {
        let mut b = AstBuilder::new();
        let one = b.integer_literal(1, Type::Int, SourceRange::default());
        let count = b.integer_literal(32, Type::Int, SourceRange::default());
        let shifted = b.binary(BinaryOp::LeftShift, one, count, Type::Int);
        let small = b.integer_literal(4, Type::Int, SourceRange::default());
        let ok = b.binary(BinaryOp::LeftShift, one, small, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, shifted), None);
        assert_eq!(int_value(&ctx, ok), Some(16));
    }

    #[test]
    fn test_const_variable_is_read() {
        let mut b = AstBuilder::new();
        let init = b.integer_literal(7, Type::Int, SourceRange::default());
        let var = b.var(
            "n",
            Default::default(),
            QualType::constant(Type::Int),
            Some(init),
            SourceRange::default(),
        );
        let reference = b.decl_ref(var, QualType::constant(Type::Int), SourceRange::default());
        let load = b.implicit_cast(CastKind::LValueToRValue, reference, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, load), Some(7));
    }

    #[test]
    fn test_mutable_variable_is_not_constant() {
        let mut b = AstBuilder::new();
        let init = b.integer_literal(7, Type::Int, SourceRange::default());
        let var = b.var(
            "x",
            Default::default(),
            QualType::new(Type::Int),
            Some(init),
            SourceRange::default(),
        );
        let reference = b.decl_ref(var, Type::Int, SourceRange::default());
        let load = b.implicit_cast(CastKind::LValueToRValue, reference, Type::Int);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, load), None);
    }

    #[test]
    fn test_floating_expression_is_not_an_int() {
        let mut b = AstBuilder::new();
        let half = b.floating_literal(0.5, Type::Double, SourceRange::default());
        let ctx = b.finish();
        assert!(ctx.expr(half).evaluate_as_int().is_none());
        assert_eq!(
            ctx.expr(half).evaluate_as_rvalue().map(|r| r.val),
            Some(APValue::Float(0.5))
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let mut b = AstBuilder::new();
        let zero = b.integer_literal(0, Type::Int, SourceRange::default());
        let one = b.integer_literal(1, Type::Int, SourceRange::default());
        let div = b.binary(BinaryOp::Div, one, zero, Type::Int);
        let and = b.binary(BinaryOp::LogicalAnd, zero, div, Type::Bool);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, and), Some(0));
    }

    #[test]
    fn test_self_referencing_constant_terminates() {
        let mut b = AstBuilder::new();
        let var = b.var(
            "n",
            Default::default(),
            QualType::constant(Type::Int),
            None,
            SourceRange::default(),
        );
        let reference = b.decl_ref(var, QualType::constant(Type::Int), SourceRange::default());
        let load = b.implicit_cast(CastKind::LValueToRValue, reference, Type::Int);
        b.set_var_init(var, load);
        let ctx = b.finish();
        assert_eq!(int_value(&ctx, load), None);
    }
}
