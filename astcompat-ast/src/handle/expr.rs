use super::{DeclNode, Located};
use crate::ast::{BinaryOp, CastKind, DeclId, Expr, ExprId, ExprKind};
use crate::context::AstContext;
use crate::types::QualType;
use astcompat_common::SourceRange;
use std::fmt;

#[derive(Clone, Copy)]
pub struct ExprNode<'a> {
    ctx: &'a AstContext,
    id: ExprId,
}

impl<'a> ExprNode<'a> {
    pub(crate) fn new(ctx: &'a AstContext, id: ExprId) -> Self {
        Self { ctx, id }
    }

    pub fn id(self) -> ExprId {
        self.id
    }

    pub fn context(self) -> &'a AstContext {
        self.ctx
    }

    pub fn node(self) -> &'a Expr {
        &self.ctx[self.id]
    }

    pub fn kind(self) -> &'a ExprKind {
        &self.node().kind
    }

    pub fn ty(self) -> &'a QualType {
        &self.node().ty
    }

    pub fn kind_name(self) -> &'static str {
        self.kind().name()
    }

    fn child(self, id: ExprId) -> ExprNode<'a> {
        ExprNode::new(self.ctx, id)
    }

    pub fn children(self) -> Vec<ExprNode<'a>> {
        self.kind()
            .children()
            .into_iter()
            .map(|id| self.child(id))
            .collect()
    }

    /// Operand of a cast, implicit wrapper or parenthesis
    pub fn sub_expr(self) -> Option<ExprNode<'a>> {
        match self.kind() {
            ExprKind::Paren(sub)
            | ExprKind::ImplicitCast { sub, .. }
            | ExprKind::StaticCast { sub, .. }
            | ExprKind::CStyleCast { sub, .. }
            | ExprKind::FunctionalCast { sub, .. }
            | ExprKind::ExprWithCleanups { sub }
            | ExprKind::BindTemporary { sub } => Some(self.child(*sub)),
            ExprKind::MaterializeTemporary { temporary } => Some(self.child(*temporary)),
            _ => None,
        }
    }

    pub fn as_cast(self) -> Option<CastNode<'a>> {
        let (kind, sub) = self.kind().cast_parts()?;
        Some(CastNode {
            expr: self,
            kind,
            sub,
        })
    }

    pub fn as_implicit_cast(self) -> Option<CastNode<'a>> {
        match self.kind() {
            ExprKind::ImplicitCast { .. } => self.as_cast(),
            _ => None,
        }
    }

    pub fn as_construct(self) -> Option<ConstructNode<'a>> {
        match self.kind() {
            ExprKind::Construct {
                constructor, args, ..
            } => Some(ConstructNode {
                expr: self,
                constructor: *constructor,
                args,
            }),
            _ => None,
        }
    }

    pub fn as_member_call(self) -> Option<MemberCallNode<'a>> {
        match self.kind() {
            ExprKind::MemberCall { callee, args } => Some(MemberCallNode {
                expr: self,
                callee: *callee,
                args,
            }),
            _ => None,
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self.kind(), ExprKind::Block { .. })
    }

    pub fn is_implicit_wrapper(self) -> bool {
        self.kind().is_implicit_wrapper()
    }

    /// The declaration a `DeclRef` names
    pub fn referenced_decl(self) -> Option<DeclNode<'a>> {
        match self.kind() {
            ExprKind::DeclRef(decl) => Some(DeclNode::new(self.ctx, *decl)),
            _ => None,
        }
    }

    pub fn ignore_parens(self) -> ExprNode<'a> {
        let mut expr = self;
        while let ExprKind::Paren(sub) = expr.kind() {
            expr = expr.child(*sub);
        }
        expr
    }

    /// Strip implicit wrappers until a fixed point: implicit casts, full
    /// expressions with cleanups, materialized temporaries and temporary
    /// bindings. Parentheses are kept.
    pub fn ignore_implicit(self) -> ExprNode<'a> {
        let mut expr = self;
        loop {
            let next = match expr.kind() {
                ExprKind::ImplicitCast { sub, .. }
                | ExprKind::ExprWithCleanups { sub }
                | ExprKind::BindTemporary { sub } => expr.child(*sub),
                ExprKind::MaterializeTemporary { temporary } => expr.child(*temporary),
                _ => return expr,
            };
            expr = next;
        }
    }
}

impl Located for ExprNode<'_> {
    fn source_range(&self) -> SourceRange {
        // implicit wrappers cover exactly what their operand covers
        let mut expr = *self;
        while expr.is_implicit_wrapper() {
            match expr.sub_expr() {
                Some(sub) => expr = sub,
                None => break,
            }
        }
        expr.node().range
    }
}

impl PartialEq for ExprNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ctx, other.ctx) && self.id == other.id
    }
}

impl Eq for ExprNode<'_> {}

impl fmt::Debug for ExprNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNode")
            .field("id", &self.id.0)
            .field("kind", &self.kind_name())
            .finish()
    }
}

/// Any cast expression, implicit or written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastNode<'a> {
    expr: ExprNode<'a>,
    kind: CastKind,
    sub: ExprId,
}

impl<'a> CastNode<'a> {
    pub fn as_expr(self) -> ExprNode<'a> {
        self.expr
    }

    pub fn cast_kind(self) -> CastKind {
        self.kind
    }

    pub fn sub_expr(self) -> ExprNode<'a> {
        self.expr.child(self.sub)
    }

    pub fn is_implicit(self) -> bool {
        matches!(self.expr.kind(), ExprKind::ImplicitCast { .. })
    }
}

/// Constructor call, written or implicit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructNode<'a> {
    expr: ExprNode<'a>,
    constructor: DeclId,
    args: &'a [ExprId],
}

impl<'a> ConstructNode<'a> {
    pub fn as_expr(self) -> ExprNode<'a> {
        self.expr
    }

    pub fn constructor(self) -> DeclNode<'a> {
        DeclNode::new(self.expr.ctx, self.constructor)
    }

    pub fn num_args(self) -> usize {
        self.args.len()
    }

    pub fn arg(self, index: usize) -> Option<ExprNode<'a>> {
        self.args.get(index).map(|id| self.expr.child(*id))
    }

    pub fn args(self) -> impl Iterator<Item = ExprNode<'a>> {
        let ctx = self.expr.ctx;
        self.args.iter().map(move |id| ExprNode::new(ctx, *id))
    }

    pub fn is_elidable(self) -> bool {
        matches!(self.expr.kind(), ExprKind::Construct { elidable: true, .. })
    }
}

/// Call of a member function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberCallNode<'a> {
    expr: ExprNode<'a>,
    callee: ExprId,
    args: &'a [ExprId],
}

impl<'a> MemberCallNode<'a> {
    pub fn as_expr(self) -> ExprNode<'a> {
        self.expr
    }

    pub fn callee(self) -> ExprNode<'a> {
        self.expr.child(self.callee)
    }

    pub fn num_args(self) -> usize {
        self.args.len()
    }

    /// The object the member function is invoked on: the base of the member
    /// expression, or the left operand of a pointer-to-member call
    pub fn implicit_object_argument(self) -> Option<ExprNode<'a>> {
        let callee = self.callee().ignore_parens();
        match callee.kind() {
            ExprKind::Member { base, .. } => Some(callee.child(*base)),
            ExprKind::Binary { op, lhs, .. } if op.is_ptr_mem() => Some(callee.child(*lhs)),
            _ => None,
        }
    }

    /// The member function called, when the callee names it
    pub fn method_decl(self) -> Option<DeclNode<'a>> {
        match self.callee().ignore_parens().kind() {
            ExprKind::Member { member, .. } => Some(DeclNode::new(self.expr.ctx, *member)),
            _ => None,
        }
    }

    /// Whether the call goes through a `.*` or `->*` operator
    pub fn is_ptr_mem_call(self) -> bool {
        matches!(
            self.callee().ignore_parens().kind(),
            ExprKind::Binary {
                op: BinaryOp::PtrMemD | BinaryOp::PtrMemI,
                ..
            }
        )
    }
}
