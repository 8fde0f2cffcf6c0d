//! AST Compatibility Layer - Host AST Model
//!
//! The elaborated syntax tree the normalization layer works on: node
//! definitions, the arena that owns them, copyable node handles, constant
//! folding, traversal, and translation units that can be loaded from JSON.
//! Accessors that older host schemas spell differently live in `legacy`.

pub mod ast;
pub mod builder;
pub mod context;
pub mod eval;
pub mod handle;
pub mod legacy;
pub mod samples;
pub mod types;
pub mod unit;
pub mod visit;

pub use ast::{CastKind, DeclId, ExprId, ExprKind, StmtId};
pub use builder::AstBuilder;
pub use context::AstContext;
pub use eval::{APValue, EvalResult};
pub use handle::{
    CastNode, ConstructNode, ConstructorDecl, ConversionDecl, DeclNode, ExprNode,
    HasExplicitSpecifier, Located, MemberCallNode, Node, StmtNode,
};
pub use types::{QualType, Type};
pub use unit::TranslationUnit;
