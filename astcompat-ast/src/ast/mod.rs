//! Abstract Syntax Tree definitions
//!
//! Nodes of the elaborated tree handed over by the host front end. Nodes are
//! stored in an `AstContext` arena and refer to each other through the id types
//! below; the implicit nodes the front end adds during elaboration (implicit
//! casts, temporaries, cleanups) are ordinary expression kinds.

pub mod declarations;
pub mod expressions;
pub mod ops;
pub mod statements;

use serde::{Deserialize, Serialize};

// Re-export commonly used types at module level
pub use declarations::{
    AccessSpecifier, BaseSpecifier, Decl, DeclKind, DeclarationNameInfo, ExplicitSpecKind,
    ExplicitSpecifier,
};
pub use expressions::{CastKind, Expr, ExprKind};
pub use ops::{BinaryOp, UnaryOp};
pub use statements::{Stmt, StmtKind};

/// Index of an expression in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(pub u32);

/// Index of a statement in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StmtId(pub u32);

/// Index of a declaration in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
