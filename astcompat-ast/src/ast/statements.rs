//! Statement AST nodes

use super::{DeclId, ExprId, StmtId};
use astcompat_common::SourceRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    /// Written range; expression statements report their expression's range
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// Empty statement (;)
    Null,

    /// Compound statement (block)
    Compound(Vec<StmtId>),

    /// Declaration statement
    Decl(Vec<DeclId>),

    /// Expression statement
    Expr(ExprId),

    Return(Option<ExprId>),

    If {
        cond: ExprId,
        then_stmt: StmtId,
        else_stmt: Option<StmtId>,
    },

    While {
        cond: ExprId,
        body: StmtId,
    },
}

impl StmtKind {
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Null => "NullStmt",
            StmtKind::Compound(_) => "CompoundStmt",
            StmtKind::Decl(_) => "DeclStmt",
            StmtKind::Expr(_) => "ExprStmt",
            StmtKind::Return(_) => "ReturnStmt",
            StmtKind::If { .. } => "IfStmt",
            StmtKind::While { .. } => "WhileStmt",
        }
    }

    pub fn child_stmts(&self) -> Vec<StmtId> {
        match self {
            StmtKind::Compound(stmts) => stmts.clone(),
            StmtKind::If {
                then_stmt,
                else_stmt,
                ..
            } => std::iter::once(*then_stmt).chain(*else_stmt).collect(),
            StmtKind::While { body, .. } => vec![*body],
            _ => Vec::new(),
        }
    }

    pub fn child_exprs(&self) -> Vec<ExprId> {
        match self {
            StmtKind::Expr(expr) => vec![*expr],
            StmtKind::Return(value) => value.iter().copied().collect(),
            StmtKind::If { cond, .. } | StmtKind::While { cond, .. } => vec![*cond],
            _ => Vec::new(),
        }
    }

    pub fn decls(&self) -> &[DeclId] {
        match self {
            StmtKind::Decl(decls) => decls,
            _ => &[],
        }
    }
}
