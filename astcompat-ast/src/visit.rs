//! Read-only traversal of a translation unit
//!
//! Implement `Visitor` and override the node kinds of interest. Call the
//! matching `walk_*` function inside an override to keep recursing; leaving it
//! out prunes the traversal at that node.

use crate::context::AstContext;
use crate::handle::{DeclNode, ExprNode, StmtNode};

pub trait Visitor<'a>: Sized {
    fn visit_decl(&mut self, decl: DeclNode<'a>) {
        walk_decl(self, decl);
    }

    fn visit_stmt(&mut self, stmt: StmtNode<'a>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: ExprNode<'a>) {
        walk_expr(self, expr);
    }
}

/// Visit every top-level declaration in order
pub fn walk_context<'a, V: Visitor<'a>>(visitor: &mut V, ctx: &'a AstContext) {
    for decl in ctx.top_level_decls() {
        visitor.visit_decl(decl);
    }
}

pub fn walk_decl<'a, V: Visitor<'a>>(visitor: &mut V, decl: DeclNode<'a>) {
    let ctx = decl.context();
    for child in decl.children() {
        visitor.visit_decl(child);
    }
    for expr in decl.kind().child_exprs() {
        visitor.visit_expr(ctx.expr(expr));
    }
    if let Some(body) = decl.body() {
        visitor.visit_stmt(body);
    }
}

pub fn walk_stmt<'a, V: Visitor<'a>>(visitor: &mut V, stmt: StmtNode<'a>) {
    for decl in stmt.decls() {
        visitor.visit_decl(decl);
    }
    for expr in stmt.child_exprs() {
        visitor.visit_expr(expr);
    }
    for child in stmt.child_stmts() {
        visitor.visit_stmt(child);
    }
}

pub fn walk_expr<'a, V: Visitor<'a>>(visitor: &mut V, expr: ExprNode<'a>) {
    for child in expr.children() {
        visitor.visit_expr(child);
    }
}
