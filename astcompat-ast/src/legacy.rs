//! Accessors as spelled by older host schemas
//!
//! Older front ends expose the same information under different names or
//! shapes: `loc_start`/`loc_end` instead of `begin_loc`/`end_loc`, a plain
//! "explicit specified" flag instead of a resolved specifier, and an integer
//! evaluation that hands back the value directly.

use crate::ast::ExplicitSpecKind;
use crate::handle::{ConstructorDecl, ConversionDecl, ExprNode, HasExplicitSpecifier, Located};
use astcompat_common::{ApsInt, SourceLocation};

pub trait LegacyLocated {
    fn loc_start(&self) -> SourceLocation;
    fn loc_end(&self) -> SourceLocation;
}

impl<T: Located + ?Sized> LegacyLocated for T {
    fn loc_start(&self) -> SourceLocation {
        self.source_range().begin
    }

    fn loc_end(&self) -> SourceLocation {
        self.source_range().end
    }
}

pub trait LegacyExplicitSpecified {
    /// Whether the declaration was written `explicit`
    fn is_explicit_specified(&self) -> bool;
}

impl LegacyExplicitSpecified for ConstructorDecl<'_> {
    fn is_explicit_specified(&self) -> bool {
        self.explicit_specifier().kind == ExplicitSpecKind::ResolvedTrue
    }
}

impl LegacyExplicitSpecified for ConversionDecl<'_> {
    fn is_explicit_specified(&self) -> bool {
        self.explicit_specifier().kind == ExplicitSpecKind::ResolvedTrue
    }
}

pub trait LegacyEvaluate {
    /// Fold to an integer; `None` when the expression is not an integer constant
    fn evaluate_as_int(&self) -> Option<ApsInt>;
}

impl LegacyEvaluate for ExprNode<'_> {
    fn evaluate_as_int(&self) -> Option<ApsInt> {
        ExprNode::evaluate_as_int(*self)?.val.into_int()
    }
}
