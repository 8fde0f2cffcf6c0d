use super::{ExprNode, Located, StmtNode};
use crate::ast::{BaseSpecifier, Decl, DeclId, DeclKind, DeclarationNameInfo, ExplicitSpecifier};
use crate::context::AstContext;
use crate::types::{QualType, Type};
use astcompat_common::SourceRange;
use std::fmt;

#[derive(Clone, Copy)]
pub struct DeclNode<'a> {
    ctx: &'a AstContext,
    id: DeclId,
}

impl<'a> DeclNode<'a> {
    pub(crate) fn new(ctx: &'a AstContext, id: DeclId) -> Self {
        Self { ctx, id }
    }

    pub fn id(self) -> DeclId {
        self.id
    }

    pub fn context(self) -> &'a AstContext {
        self.ctx
    }

    pub fn node(self) -> &'a Decl {
        &self.ctx[self.id]
    }

    pub fn kind(self) -> &'a DeclKind {
        &self.node().kind
    }

    pub fn kind_name(self) -> &'static str {
        self.kind().name()
    }

    pub fn name(self) -> &'a str {
        &self.node().name.name
    }

    pub fn name_info(self) -> &'a DeclarationNameInfo {
        &self.node().name
    }

    /// Declared type of variables, parameters and fields
    pub fn declared_type(self) -> Option<&'a QualType> {
        match self.kind() {
            DeclKind::Var { ty, .. } | DeclKind::ParmVar { ty } | DeclKind::Field { ty } => {
                Some(ty)
            }
            _ => None,
        }
    }

    pub fn init(self) -> Option<ExprNode<'a>> {
        match self.kind() {
            DeclKind::Var { init: Some(init), .. } => Some(ExprNode::new(self.ctx, *init)),
            _ => None,
        }
    }

    pub fn body(self) -> Option<StmtNode<'a>> {
        self.kind().body().map(|body| StmtNode::new(self.ctx, body))
    }

    pub fn parent(self) -> Option<DeclNode<'a>> {
        self.kind().parent().map(|parent| DeclNode::new(self.ctx, parent))
    }

    pub fn children(self) -> Vec<DeclNode<'a>> {
        self.kind()
            .child_decls()
            .iter()
            .map(|id| DeclNode::new(self.ctx, *id))
            .collect()
    }

    pub fn bases(self) -> &'a [BaseSpecifier] {
        match self.kind() {
            DeclKind::Record { bases, .. } => bases,
            _ => &[],
        }
    }

    pub fn as_constructor(self) -> Option<ConstructorDecl<'a>> {
        match self.kind() {
            DeclKind::Constructor { explicit, .. } => Some(ConstructorDecl {
                decl: self,
                explicit,
            }),
            _ => None,
        }
    }

    pub fn as_conversion(self) -> Option<ConversionDecl<'a>> {
        match self.kind() {
            DeclKind::Conversion {
                explicit, target, ..
            } => Some(ConversionDecl {
                decl: self,
                explicit,
                target,
            }),
            _ => None,
        }
    }
}

impl Located for DeclNode<'_> {
    fn source_range(&self) -> SourceRange {
        self.node().range
    }
}

impl PartialEq for DeclNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ctx, other.ctx) && self.id == other.id
    }
}

impl Eq for DeclNode<'_> {}

impl fmt::Debug for DeclNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclNode")
            .field("id", &self.id.0)
            .field("kind", &self.kind_name())
            .field("name", &self.name())
            .finish()
    }
}

/// Declarations that can carry an `explicit` specifier
pub trait HasExplicitSpecifier {
    fn explicit_specifier(&self) -> &ExplicitSpecifier;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructorDecl<'a> {
    decl: DeclNode<'a>,
    explicit: &'a ExplicitSpecifier,
}

impl<'a> ConstructorDecl<'a> {
    pub fn as_decl(self) -> DeclNode<'a> {
        self.decl
    }

    /// The class this constructor builds
    pub fn parent(self) -> Option<DeclNode<'a>> {
        self.decl.parent()
    }

    pub fn num_params(self) -> usize {
        self.decl.kind().child_decls().len()
    }
}

impl HasExplicitSpecifier for ConstructorDecl<'_> {
    fn explicit_specifier(&self) -> &ExplicitSpecifier {
        self.explicit
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionDecl<'a> {
    decl: DeclNode<'a>,
    explicit: &'a ExplicitSpecifier,
    target: &'a Type,
}

impl<'a> ConversionDecl<'a> {
    pub fn as_decl(self) -> DeclNode<'a> {
        self.decl
    }

    pub fn conversion_type(self) -> &'a Type {
        self.target
    }
}

impl HasExplicitSpecifier for ConversionDecl<'_> {
    fn explicit_specifier(&self) -> &ExplicitSpecifier {
        self.explicit
    }
}
