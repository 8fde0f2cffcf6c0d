//! Expression AST nodes
//!
//! This module defines expression nodes, including the implicit nodes the
//! front end inserts while elaborating the tree.

use super::ops::{BinaryOp, UnaryOp};
use super::{DeclId, ExprId};
use crate::types::QualType;
use astcompat_common::SourceRange;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: QualType,
    /// Written range. Implicit wrappers have none of their own and report their operand's.
    pub range: SourceRange,
}

/// What a cast converts, as decided by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastKind {
    NoOp,
    LValueToRValue,
    IntegralCast,
    IntegralToBoolean,
    IntegralToFloating,
    FloatingToIntegral,
    FloatingToBoolean,
    FloatingCast,
    ArrayToPointerDecay,
    FunctionToPointerDecay,
    NullToPointer,
    BitCast,
    PointerToBoolean,
    DerivedToBase,
    BaseToDerived,
    /// Conversion through a converting constructor; the operand is the construct expression
    ConstructorConversion,
    /// Conversion through a conversion function; the operand is the member call
    UserDefinedConversion,
    ToVoid,
    Dependent,
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    IntegerLiteral(u128),
    CharacterLiteral(u32),
    BoolLiteral(bool),
    FloatingLiteral(f64),
    StringLiteral(String),

    /// Reference to a variable, parameter, function or enum constant
    DeclRef(DeclId),

    Paren(ExprId),

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Ternary conditional operator (cond ? then_expr : else_expr)
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    Member {
        base: ExprId,
        member: DeclId,
        is_arrow: bool,
    },

    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },

    /// Call of a member function; the callee is a member or pointer-to-member expression
    MemberCall {
        callee: ExprId,
        args: Vec<ExprId>,
    },

    Construct {
        constructor: DeclId,
        args: Vec<ExprId>,
        elidable: bool,
    },

    ImplicitCast {
        kind: CastKind,
        sub: ExprId,
    },

    StaticCast {
        kind: CastKind,
        sub: ExprId,
    },

    CStyleCast {
        kind: CastKind,
        sub: ExprId,
    },

    FunctionalCast {
        kind: CastKind,
        sub: ExprId,
    },

    /// Full expression whose temporaries need destruction
    ExprWithCleanups {
        sub: ExprId,
    },

    /// Prvalue materialized into a temporary object
    MaterializeTemporary {
        temporary: ExprId,
    },

    /// Binding of a temporary to its destructor
    BindTemporary {
        sub: ExprId,
    },

    /// Block or closure literal
    Block {
        decl: Option<DeclId>,
    },
}

impl ExprKind {
    /// Node class name, as the host's AST dumps spell it
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::IntegerLiteral(_) => "IntegerLiteral",
            ExprKind::CharacterLiteral(_) => "CharacterLiteral",
            ExprKind::BoolLiteral(_) => "CXXBoolLiteralExpr",
            ExprKind::FloatingLiteral(_) => "FloatingLiteral",
            ExprKind::StringLiteral(_) => "StringLiteral",
            ExprKind::DeclRef(_) => "DeclRefExpr",
            ExprKind::Paren(_) => "ParenExpr",
            ExprKind::Unary { .. } => "UnaryOperator",
            ExprKind::Binary { .. } => "BinaryOperator",
            ExprKind::Conditional { .. } => "ConditionalOperator",
            ExprKind::Member { .. } => "MemberExpr",
            ExprKind::Call { .. } => "CallExpr",
            ExprKind::MemberCall { .. } => "CXXMemberCallExpr",
            ExprKind::Construct { .. } => "CXXConstructExpr",
            ExprKind::ImplicitCast { .. } => "ImplicitCastExpr",
            ExprKind::StaticCast { .. } => "CXXStaticCastExpr",
            ExprKind::CStyleCast { .. } => "CStyleCastExpr",
            ExprKind::FunctionalCast { .. } => "CXXFunctionalCastExpr",
            ExprKind::ExprWithCleanups { .. } => "ExprWithCleanups",
            ExprKind::MaterializeTemporary { .. } => "MaterializeTemporaryExpr",
            ExprKind::BindTemporary { .. } => "CXXBindTemporaryExpr",
            ExprKind::Block { .. } => "BlockExpr",
        }
    }

    /// Cast kind and operand of any cast expression
    pub fn cast_parts(&self) -> Option<(CastKind, ExprId)> {
        match self {
            ExprKind::ImplicitCast { kind, sub }
            | ExprKind::StaticCast { kind, sub }
            | ExprKind::CStyleCast { kind, sub }
            | ExprKind::FunctionalCast { kind, sub } => Some((*kind, *sub)),
            _ => None,
        }
    }

    /// Whether this is a node the front end inserts without the programmer writing it
    pub fn is_implicit_wrapper(&self) -> bool {
        matches!(
            self,
            ExprKind::ImplicitCast { .. }
                | ExprKind::ExprWithCleanups { .. }
                | ExprKind::MaterializeTemporary { .. }
                | ExprKind::BindTemporary { .. }
        )
    }

    /// Direct sub-expressions in source order
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            ExprKind::IntegerLiteral(_)
            | ExprKind::CharacterLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::FloatingLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::DeclRef(_)
            | ExprKind::Block { .. } => Vec::new(),
            ExprKind::Paren(sub) => vec![*sub],
            ExprKind::Unary { operand, .. } => vec![*operand],
            ExprKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                vec![*cond, *then_expr, *else_expr]
            }
            ExprKind::Member { base, .. } => vec![*base],
            ExprKind::Call { callee, args } | ExprKind::MemberCall { callee, args } => {
                std::iter::once(*callee).chain(args.iter().copied()).collect()
            }
            ExprKind::Construct { args, .. } => args.clone(),
            ExprKind::ImplicitCast { sub, .. }
            | ExprKind::StaticCast { sub, .. }
            | ExprKind::CStyleCast { sub, .. }
            | ExprKind::FunctionalCast { sub, .. }
            | ExprKind::ExprWithCleanups { sub }
            | ExprKind::BindTemporary { sub } => vec![*sub],
            ExprKind::MaterializeTemporary { temporary } => vec![*temporary],
        }
    }

    /// Declarations this node refers to
    pub fn referenced_decls(&self) -> Vec<DeclId> {
        match self {
            ExprKind::DeclRef(decl) => vec![*decl],
            ExprKind::Member { member, .. } => vec![*member],
            ExprKind::Construct { constructor, .. } => vec![*constructor],
            ExprKind::Block { decl: Some(decl) } => vec![*decl],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_parts() {
        let cast = ExprKind::StaticCast {
            kind: CastKind::ConstructorConversion,
            sub: ExprId(4),
        };
        assert_eq!(cast.cast_parts(), Some((CastKind::ConstructorConversion, ExprId(4))));
        assert!(!cast.is_implicit_wrapper());
        assert_eq!(ExprKind::IntegerLiteral(1).cast_parts(), None);
    }

    #[test]
    fn test_implicit_wrappers() {
        assert!(ExprKind::BindTemporary { sub: ExprId(0) }.is_implicit_wrapper());
        assert!(ExprKind::MaterializeTemporary { temporary: ExprId(0) }.is_implicit_wrapper());
        assert!(!ExprKind::Paren(ExprId(0)).is_implicit_wrapper());
    }

    #[test]
    fn test_children_order() {
        let call = ExprKind::MemberCall {
            callee: ExprId(1),
            args: vec![ExprId(2), ExprId(3)],
        };
        assert_eq!(call.children(), vec![ExprId(1), ExprId(2), ExprId(3)]);
        assert_eq!(call.name(), "CXXMemberCallExpr");
    }
}
