//! Node handles
//!
//! A handle is a copyable reference to one node plus the context that owns it.
//! Two handles are equal when they name the same node of the same context, so
//! callers can compare what an operation returned with a node they hold.

mod decl;
mod expr;
mod stmt;

pub use decl::{ConstructorDecl, ConversionDecl, DeclNode, HasExplicitSpecifier};
pub use expr::{CastNode, ConstructNode, ExprNode, MemberCallNode};
pub use stmt::StmtNode;

use crate::ast::{BaseSpecifier, DeclarationNameInfo};
use astcompat_common::{SourceLocation, SourceRange};

/// Anything with a written source range
pub trait Located {
    fn source_range(&self) -> SourceRange;

    fn begin_loc(&self) -> SourceLocation {
        self.source_range().begin
    }

    fn end_loc(&self) -> SourceLocation {
        self.source_range().end
    }
}

/// Any node kind the location accessors accept
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Decl(DeclNode<'a>),
    Stmt(StmtNode<'a>),
    Expr(ExprNode<'a>),
    BaseSpecifier(&'a BaseSpecifier),
    NameInfo(&'a DeclarationNameInfo),
}

impl Node<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Decl(decl) => decl.kind_name(),
            Node::Stmt(stmt) => stmt.kind_name(),
            Node::Expr(expr) => expr.kind_name(),
            Node::BaseSpecifier(_) => "CXXBaseSpecifier",
            Node::NameInfo(_) => "DeclarationNameInfo",
        }
    }
}

impl Located for Node<'_> {
    fn source_range(&self) -> SourceRange {
        match self {
            Node::Decl(decl) => decl.source_range(),
            Node::Stmt(stmt) => stmt.source_range(),
            Node::Expr(expr) => expr.source_range(),
            Node::BaseSpecifier(base) => base.source_range(),
            Node::NameInfo(info) => info.source_range(),
        }
    }
}

impl Located for BaseSpecifier {
    fn source_range(&self) -> SourceRange {
        self.range
    }
}

impl Located for DeclarationNameInfo {
    fn source_range(&self) -> SourceRange {
        self.range()
    }
}

impl<'a> From<ExprNode<'a>> for Node<'a> {
    fn from(expr: ExprNode<'a>) -> Self {
        Node::Expr(expr)
    }
}

impl<'a> From<StmtNode<'a>> for Node<'a> {
    fn from(stmt: StmtNode<'a>) -> Self {
        Node::Stmt(stmt)
    }
}

impl<'a> From<DeclNode<'a>> for Node<'a> {
    fn from(decl: DeclNode<'a>) -> Self {
        Node::Decl(decl)
    }
}
