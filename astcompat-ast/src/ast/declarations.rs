//! Declaration AST nodes

use super::{DeclId, ExprId, StmtId};
use crate::types::{QualType, Type};
use astcompat_common::{ApsInt, SourceLocation, SourceRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: DeclarationNameInfo,
    pub range: SourceRange,
}

/// A declared name together with where it is written.
///
/// Operator names span several tokens (`operator ResString`), so the name has
/// an end location of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationNameInfo {
    pub name: String,
    pub loc: SourceLocation,
    /// Start of the last token of the name; invalid for single-token names
    pub end_loc: SourceLocation,
}

impl DeclarationNameInfo {
    pub fn new(name: &str, loc: SourceLocation) -> Self {
        Self {
            name: name.to_string(),
            loc,
            end_loc: SourceLocation::INVALID,
        }
    }

    pub fn with_end(name: &str, loc: SourceLocation, end_loc: SourceLocation) -> Self {
        Self {
            name: name.to_string(),
            loc,
            end_loc,
        }
    }

    pub fn range(&self) -> SourceRange {
        let end = if self.end_loc.is_valid() {
            self.end_loc
        } else {
            self.loc
        };
        SourceRange::new(self.loc, end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
}

/// One entry of a class's base clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSpecifier {
    pub range: SourceRange,
    pub base_type: Type,
    pub is_virtual: bool,
    pub access: AccessSpecifier,
}

/// How an `explicit` specifier resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplicitSpecKind {
    /// No specifier, or `explicit(false)`
    ResolvedFalse,
    /// `explicit` or `explicit(true)`
    ResolvedTrue,
    /// `explicit(expr)` with a value-dependent condition
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitSpecifier {
    pub kind: ExplicitSpecKind,
    /// Condition of a conditional specifier
    pub expr: Option<ExprId>,
}

impl ExplicitSpecifier {
    pub fn none() -> Self {
        Self {
            kind: ExplicitSpecKind::ResolvedFalse,
            expr: None,
        }
    }

    pub fn explicit() -> Self {
        Self {
            kind: ExplicitSpecKind::ResolvedTrue,
            expr: None,
        }
    }

    pub fn conditional(kind: ExplicitSpecKind, expr: ExprId) -> Self {
        Self {
            kind,
            expr: Some(expr),
        }
    }

    /// Whether the declaration is known to be explicit
    pub fn is_explicit(&self) -> bool {
        self.kind == ExplicitSpecKind::ResolvedTrue
    }

    /// Whether any specifier was written
    pub fn is_specified(&self) -> bool {
        self.kind != ExplicitSpecKind::ResolvedFalse || self.expr.is_some()
    }
}

impl Default for ExplicitSpecifier {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    Var {
        ty: QualType,
        init: Option<ExprId>,
    },

    ParmVar {
        ty: QualType,
    },

    Function {
        return_type: Type,
        params: Vec<DeclId>,
        body: Option<StmtId>,
    },

    /// Class, struct or union
    Record {
        bases: Vec<BaseSpecifier>,
        members: Vec<DeclId>,
    },

    Field {
        ty: QualType,
    },

    Method {
        parent: DeclId,
        return_type: Type,
        params: Vec<DeclId>,
        body: Option<StmtId>,
        is_const: bool,
    },

    Constructor {
        parent: DeclId,
        params: Vec<DeclId>,
        body: Option<StmtId>,
        explicit: ExplicitSpecifier,
    },

    /// Conversion function (`operator T()`)
    Conversion {
        parent: DeclId,
        target: Type,
        body: Option<StmtId>,
        explicit: ExplicitSpecifier,
        is_const: bool,
    },

    Enum {
        underlying: Type,
        constants: Vec<DeclId>,
    },

    EnumConstant {
        value: ApsInt,
    },
}

impl DeclKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeclKind::Var { .. } => "VarDecl",
            DeclKind::ParmVar { .. } => "ParmVarDecl",
            DeclKind::Function { .. } => "FunctionDecl",
            DeclKind::Record { .. } => "CXXRecordDecl",
            DeclKind::Field { .. } => "FieldDecl",
            DeclKind::Method { .. } => "CXXMethodDecl",
            DeclKind::Constructor { .. } => "CXXConstructorDecl",
            DeclKind::Conversion { .. } => "CXXConversionDecl",
            DeclKind::Enum { .. } => "EnumDecl",
            DeclKind::EnumConstant { .. } => "EnumConstantDecl",
        }
    }

    /// Nested declarations (parameters, members, enumerators)
    pub fn child_decls(&self) -> &[DeclId] {
        match self {
            DeclKind::Function { params, .. }
            | DeclKind::Method { params, .. }
            | DeclKind::Constructor { params, .. } => params,
            DeclKind::Record { members, .. } => members,
            DeclKind::Enum { constants, .. } => constants,
            _ => &[],
        }
    }

    pub fn body(&self) -> Option<StmtId> {
        match self {
            DeclKind::Function { body, .. }
            | DeclKind::Method { body, .. }
            | DeclKind::Constructor { body, .. }
            | DeclKind::Conversion { body, .. } => *body,
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<DeclId> {
        match self {
            DeclKind::Method { parent, .. }
            | DeclKind::Constructor { parent, .. }
            | DeclKind::Conversion { parent, .. } => Some(*parent),
            _ => None,
        }
    }

    /// Expressions owned by the declaration
    pub fn child_exprs(&self) -> Vec<ExprId> {
        match self {
            DeclKind::Var { init, .. } => init.iter().copied().collect(),
            DeclKind::Constructor { explicit, .. } | DeclKind::Conversion { explicit, .. } => {
                explicit.expr.iter().copied().collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_specifier() {
        assert!(!ExplicitSpecifier::none().is_explicit());
        assert!(!ExplicitSpecifier::none().is_specified());
        assert!(ExplicitSpecifier::explicit().is_explicit());

        let dependent = ExplicitSpecifier::conditional(ExplicitSpecKind::Unresolved, ExprId(7));
        assert!(!dependent.is_explicit());
        assert!(dependent.is_specified());

        let written_false =
            ExplicitSpecifier::conditional(ExplicitSpecKind::ResolvedFalse, ExprId(2));
        assert!(!written_false.is_explicit());
        assert!(written_false.is_specified());
    }

    #[test]
    fn test_name_info_range() {
        let single = DeclarationNameInfo::new("aEr", SourceLocation::file(10));
        assert_eq!(single.range(), SourceRange::from_location(SourceLocation::file(10)));

        let operator = DeclarationNameInfo::with_end(
            "operator ResString",
            SourceLocation::file(20),
            SourceLocation::file(29),
        );
        assert_eq!(operator.range().end, SourceLocation::file(29));
    }

    #[test]
    fn test_child_decls() {
        let record = DeclKind::Record {
            bases: Vec::new(),
            members: vec![DeclId(1), DeclId(2)],
        };
        assert_eq!(record.child_decls(), &[DeclId(1), DeclId(2)]);
        assert_eq!(record.name(), "CXXRecordDecl");
        let constant = DeclKind::EnumConstant {
            value: ApsInt::from_i64(1, 32, false),
        };
        assert_eq!(constant.child_decls().len(), 0);
    }
}
