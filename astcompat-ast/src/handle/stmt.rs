use super::{DeclNode, ExprNode, Located};
use crate::ast::{Stmt, StmtId, StmtKind};
use crate::context::AstContext;
use astcompat_common::SourceRange;
use std::fmt;

#[derive(Clone, Copy)]
pub struct StmtNode<'a> {
    ctx: &'a AstContext,
    id: StmtId,
}

impl<'a> StmtNode<'a> {
    pub(crate) fn new(ctx: &'a AstContext, id: StmtId) -> Self {
        Self { ctx, id }
    }

    pub fn id(self) -> StmtId {
        self.id
    }

    pub fn context(self) -> &'a AstContext {
        self.ctx
    }

    pub fn node(self) -> &'a Stmt {
        &self.ctx[self.id]
    }

    pub fn kind(self) -> &'a StmtKind {
        &self.node().kind
    }

    pub fn kind_name(self) -> &'static str {
        self.kind().name()
    }

    pub fn child_stmts(self) -> Vec<StmtNode<'a>> {
        self.kind()
            .child_stmts()
            .into_iter()
            .map(|id| StmtNode::new(self.ctx, id))
            .collect()
    }

    pub fn child_exprs(self) -> Vec<ExprNode<'a>> {
        self.kind()
            .child_exprs()
            .into_iter()
            .map(|id| ExprNode::new(self.ctx, id))
            .collect()
    }

    pub fn decls(self) -> Vec<DeclNode<'a>> {
        self.kind()
            .decls()
            .iter()
            .map(|id| DeclNode::new(self.ctx, *id))
            .collect()
    }
}

impl Located for StmtNode<'_> {
    fn source_range(&self) -> SourceRange {
        match self.kind() {
            StmtKind::Expr(expr) => ExprNode::new(self.ctx, *expr).source_range(),
            _ => self.node().range,
        }
    }
}

impl PartialEq for StmtNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ctx, other.ctx) && self.id == other.id
    }
}

impl Eq for StmtNode<'_> {}

impl fmt::Debug for StmtNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StmtNode")
            .field("id", &self.id.0)
            .field("kind", &self.kind_name())
            .finish()
    }
}
