//! Stripping of implicit nodes inserted during elaboration

use crate::schema::{revisions, ACTIVE};
use astcompat_ast::ExprNode;

pub mod legacy {
    use astcompat_ast::{ExprKind, ExprNode};
    use log::trace;

    /// Replace `expr` by its operand when `unwraps` accepts its kind
    fn unwrap_if<'a>(expr: ExprNode<'a>, unwraps: fn(&ExprKind) -> bool) -> ExprNode<'a> {
        if !unwraps(expr.kind()) {
            return expr;
        }
        match expr.sub_expr() {
            Some(sub) => {
                trace!("unwrapped {}", expr.kind_name());
                sub
            }
            None => expr,
        }
    }

    /// Repeat passes of cleanups, materialized temporary, temporary binding and
    /// implicit cast removal, in that order, until a pass removes nothing
    pub fn ignore_implicit(expr: ExprNode<'_>) -> ExprNode<'_> {
        let mut current = expr;
        loop {
            let last = current;
            current = unwrap_if(current, |k| matches!(k, ExprKind::ExprWithCleanups { .. }));
            current = unwrap_if(current, |k| matches!(k, ExprKind::MaterializeTemporary { .. }));
            current = unwrap_if(current, |k| matches!(k, ExprKind::BindTemporary { .. }));
            current = unwrap_if(current, |k| matches!(k, ExprKind::ImplicitCast { .. }));
            if current == last {
                return current;
            }
        }
    }
}

pub mod current {
    use astcompat_ast::ExprNode;

    pub fn ignore_implicit(expr: ExprNode<'_>) -> ExprNode<'_> {
        expr.ignore_implicit()
    }
}

/// The expression under every implicit cast, cleanup scope, materialized
/// temporary and temporary binding on top of `expr`. Parentheses stay.
pub fn ignore_implicit(expr: ExprNode<'_>) -> ExprNode<'_> {
    if ACTIVE.at_least(revisions::IGNORE_IMPLICIT) {
        current::ignore_implicit(expr)
    } else {
        legacy::ignore_implicit(expr)
    }
}
