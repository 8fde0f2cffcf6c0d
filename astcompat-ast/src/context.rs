//! Arena holding every node of one translation unit

use crate::ast::{Decl, DeclId, Expr, ExprId, Stmt, StmtId};
use crate::handle::{DeclNode, ExprNode, StmtNode};
use astcompat_common::CompatError;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Node storage. Children are always allocated before their parents, so an
/// expression's operands carry smaller ids than the expression itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstContext {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    top_level: Vec<DeclId>,
}

impl AstContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn add_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn add_top_level(&mut self, decl: DeclId) {
        self.top_level.push(decl);
    }

    pub fn top_level(&self) -> &[DeclId] {
        &self.top_level
    }

    pub fn get_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    pub fn get_stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.stmts.get(id.index())
    }

    pub fn get_decl(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.index())
    }

    pub fn decl_mut(&mut self, id: DeclId) -> Option<&mut Decl> {
        self.decls.get_mut(id.index())
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Handle to an expression. The id must come from this context.
    pub fn expr(&self, id: ExprId) -> ExprNode<'_> {
        ExprNode::new(self, id)
    }

    pub fn stmt(&self, id: StmtId) -> StmtNode<'_> {
        StmtNode::new(self, id)
    }

    pub fn decl(&self, id: DeclId) -> DeclNode<'_> {
        DeclNode::new(self, id)
    }

    pub fn top_level_decls(&self) -> impl Iterator<Item = DeclNode<'_>> + '_ {
        self.top_level.iter().map(move |id| self.decl(*id))
    }

    pub fn exprs(&self) -> impl Iterator<Item = ExprNode<'_>> + '_ {
        (0..self.exprs.len() as u32).map(move |id| self.expr(ExprId(id)))
    }

    /// Check that every reference between nodes resolves, and that expression,
    /// statement and declaration nesting is acyclic. Deserialized contexts must
    /// pass this before handles are created for them.
    pub fn validate(&self) -> Result<(), CompatError> {
        for (index, expr) in self.exprs.iter().enumerate() {
            for child in expr.kind.children() {
                if child.index() >= index {
                    return Err(CompatError::malformed_ast(format!(
                        "expression {index} ({}) refers to expression {} which does not precede it",
                        expr.kind.name(),
                        child.0
                    )));
                }
            }
            for decl in expr.kind.referenced_decls() {
                self.check_decl(decl, "expression", index)?;
            }
        }

        for (index, stmt) in self.stmts.iter().enumerate() {
            for child in stmt.kind.child_stmts() {
                if child.index() >= index {
                    return Err(CompatError::malformed_ast(format!(
                        "statement {index} ({}) refers to statement {} which does not precede it",
                        stmt.kind.name(),
                        child.0
                    )));
                }
            }
            for expr in stmt.kind.child_exprs() {
                self.check_expr(expr, "statement", index)?;
            }
            for decl in stmt.kind.decls() {
                self.check_decl(*decl, "statement", index)?;
            }
        }

        for (index, decl) in self.decls.iter().enumerate() {
            for child in decl.kind.child_decls() {
                self.check_decl(*child, "declaration", index)?;
            }
            if let Some(parent) = decl.kind.parent() {
                self.check_decl(parent, "declaration", index)?;
            }
            if let Some(body) = decl.kind.body() {
                if body.index() >= self.stmts.len() {
                    return Err(CompatError::malformed_ast(format!(
                        "declaration {index} has body statement {} out of range",
                        body.0
                    )));
                }
            }
            for expr in decl.kind.child_exprs() {
                self.check_expr(expr, "declaration", index)?;
            }
        }

        for decl in &self.top_level {
            self.check_decl(*decl, "translation unit", 0)?;
        }
        self.check_decl_nesting()
    }

    /// Members, parameters, enumerators and the declarations in the body
    fn nested_decls(&self, decl: &Decl) -> Vec<DeclId> {
        let mut nested = decl.kind.child_decls().to_vec();
        let mut pending: Vec<StmtId> = decl.kind.body().into_iter().collect();
        while let Some(stmt) = pending.pop() {
            let kind = &self[stmt].kind;
            nested.extend_from_slice(kind.decls());
            pending.extend(kind.child_stmts());
        }
        nested
    }

    /// Depth-first search over declaration nesting; runs after the range
    /// checks, so every id it follows resolves.
    fn check_decl_nesting(&self) -> Result<(), CompatError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Open,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.decls.len()];
        for root in 0..self.decls.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::Open;
            let mut stack = vec![(root, self.nested_decls(&self.decls[root]))];
            while let Some(top) = stack.last_mut() {
                let index = top.0;
                match top.1.pop() {
                    Some(child) => match marks[child.index()] {
                        Mark::Unvisited => {
                            marks[child.index()] = Mark::Open;
                            stack.push((child.index(), self.nested_decls(&self[child])));
                        }
                        Mark::Open => {
                            return Err(CompatError::malformed_ast(format!(
                                "declaration {} ('{}') is nested inside itself",
                                child.0, self[child].name.name
                            )));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[index] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn check_expr(&self, id: ExprId, owner: &str, index: usize) -> Result<(), CompatError> {
        if id.index() < self.exprs.len() {
            Ok(())
        } else {
            Err(CompatError::malformed_ast(format!(
                "{owner} {index} refers to expression {} out of range",
                id.0
            )))
        }
    }

    fn check_decl(&self, id: DeclId, owner: &str, index: usize) -> Result<(), CompatError> {
        if id.index() < self.decls.len() {
            Ok(())
        } else {
            Err(CompatError::malformed_ast(format!(
                "{owner} {index} refers to declaration {} out of range",
                id.0
            )))
        }
    }
}

impl Index<ExprId> for AstContext {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }
}

impl Index<StmtId> for AstContext {
    type Output = Stmt;

    fn index(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }
}

impl Index<DeclId> for AstContext {
    type Output = Decl;

    fn index(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }
}
