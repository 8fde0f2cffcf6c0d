//! Programmatic construction of elaborated trees
//!
//! Used by the sample translation units and by tests. Children must be built
//! before their parents, which keeps every tree the builder produces acyclic.

use crate::ast::{
    BaseSpecifier, BinaryOp, CastKind, Decl, DeclId, DeclKind, DeclarationNameInfo,
    ExplicitSpecifier, Expr, ExprId, ExprKind, Stmt, StmtId, StmtKind, UnaryOp,
};
use crate::context::AstContext;
use crate::handle::Located;
use crate::types::{QualType, Type};
use astcompat_common::{ApsInt, SourceLocation, SourceRange};

#[derive(Debug, Default)]
pub struct AstBuilder {
    ctx: AstContext,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &AstContext {
        &self.ctx
    }

    pub fn finish(self) -> AstContext {
        self.ctx
    }

    fn range_of(&self, expr: ExprId) -> SourceRange {
        self.ctx.expr(expr).source_range()
    }

    fn type_of(&self, expr: ExprId) -> QualType {
        self.ctx[expr].ty.clone()
    }

    // Expressions

    pub fn expr(&mut self, kind: ExprKind, ty: impl Into<QualType>, range: SourceRange) -> ExprId {
        self.ctx.add_expr(Expr {
            kind,
            ty: ty.into(),
            range,
        })
    }

    pub fn integer_literal(&mut self, value: u128, ty: Type, range: SourceRange) -> ExprId {
        self.expr(ExprKind::IntegerLiteral(value), ty, range)
    }

    pub fn character_literal(&mut self, value: u32, ty: Type, range: SourceRange) -> ExprId {
        self.expr(ExprKind::CharacterLiteral(value), ty, range)
    }

    pub fn bool_literal(&mut self, value: bool, range: SourceRange) -> ExprId {
        self.expr(ExprKind::BoolLiteral(value), Type::Bool, range)
    }

    pub fn floating_literal(&mut self, value: f64, ty: Type, range: SourceRange) -> ExprId {
        self.expr(ExprKind::FloatingLiteral(value), ty, range)
    }

    pub fn decl_ref(
        &mut self,
        decl: DeclId,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::DeclRef(decl), ty, range)
    }

    pub fn paren(&mut self, sub: ExprId, range: SourceRange) -> ExprId {
        let ty = self.type_of(sub);
        self.expr(ExprKind::Paren(sub), ty, range)
    }

    pub fn unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::Unary { op, operand }, ty, range)
    }

    /// Binary operator spanning from the start of `lhs` to the end of `rhs`
    pub fn binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        ty: impl Into<QualType>,
    ) -> ExprId {
        let range = SourceRange::new(self.range_of(lhs).begin, self.range_of(rhs).end);
        self.expr(ExprKind::Binary { op, lhs, rhs }, ty, range)
    }

    pub fn conditional(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        ty: impl Into<QualType>,
    ) -> ExprId {
        let range = SourceRange::new(self.range_of(cond).begin, self.range_of(else_expr).end);
        self.expr(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            ty,
            range,
        )
    }

    pub fn member(
        &mut self,
        base: ExprId,
        member: DeclId,
        is_arrow: bool,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(
            ExprKind::Member {
                base,
                member,
                is_arrow,
            },
            ty,
            range,
        )
    }

    pub fn call(
        &mut self,
        callee: ExprId,
        args: Vec<ExprId>,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::Call { callee, args }, ty, range)
    }

    pub fn member_call(
        &mut self,
        callee: ExprId,
        args: Vec<ExprId>,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::MemberCall { callee, args }, ty, range)
    }

    pub fn construct(
        &mut self,
        constructor: DeclId,
        args: Vec<ExprId>,
        elidable: bool,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(
            ExprKind::Construct {
                constructor,
                args,
                elidable,
            },
            ty,
            range,
        )
    }

    /// Implicit cast; it has no range of its own
    pub fn implicit_cast(
        &mut self,
        kind: CastKind,
        sub: ExprId,
        ty: impl Into<QualType>,
    ) -> ExprId {
        self.expr(ExprKind::ImplicitCast { kind, sub }, ty, SourceRange::default())
    }

    pub fn static_cast(
        &mut self,
        kind: CastKind,
        sub: ExprId,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::StaticCast { kind, sub }, ty, range)
    }

    pub fn c_style_cast(
        &mut self,
        kind: CastKind,
        sub: ExprId,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::CStyleCast { kind, sub }, ty, range)
    }

    pub fn functional_cast(
        &mut self,
        kind: CastKind,
        sub: ExprId,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::FunctionalCast { kind, sub }, ty, range)
    }

    pub fn expr_with_cleanups(&mut self, sub: ExprId) -> ExprId {
        let ty = self.type_of(sub);
        self.expr(ExprKind::ExprWithCleanups { sub }, ty, SourceRange::default())
    }

    pub fn materialize_temporary(&mut self, temporary: ExprId) -> ExprId {
        let ty = self.type_of(temporary);
        self.expr(ExprKind::MaterializeTemporary { temporary }, ty, SourceRange::default())
    }

    pub fn bind_temporary(&mut self, sub: ExprId) -> ExprId {
        let ty = self.type_of(sub);
        self.expr(ExprKind::BindTemporary { sub }, ty, SourceRange::default())
    }

    pub fn block(
        &mut self,
        decl: Option<DeclId>,
        ty: impl Into<QualType>,
        range: SourceRange,
    ) -> ExprId {
        self.expr(ExprKind::Block { decl }, ty, range)
    }

    // Statements

    pub fn stmt(&mut self, kind: StmtKind, range: SourceRange) -> StmtId {
        self.ctx.add_stmt(Stmt { kind, range })
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        let range = self.range_of(expr);
        self.stmt(StmtKind::Expr(expr), range)
    }

    pub fn compound(&mut self, stmts: Vec<StmtId>, range: SourceRange) -> StmtId {
        self.stmt(StmtKind::Compound(stmts), range)
    }

    pub fn decl_stmt(&mut self, decls: Vec<DeclId>, range: SourceRange) -> StmtId {
        self.stmt(StmtKind::Decl(decls), range)
    }

    pub fn return_stmt(&mut self, value: Option<ExprId>, range: SourceRange) -> StmtId {
        self.stmt(StmtKind::Return(value), range)
    }

    pub fn if_stmt(
        &mut self,
        cond: ExprId,
        then_stmt: StmtId,
        else_stmt: Option<StmtId>,
        range: SourceRange,
    ) -> StmtId {
        self.stmt(
            StmtKind::If {
                cond,
                then_stmt,
                else_stmt,
            },
            range,
        )
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: StmtId, range: SourceRange) -> StmtId {
        self.stmt(StmtKind::While { cond, body }, range)
    }

    // Declarations

    pub fn decl(
        &mut self,
        kind: DeclKind,
        name: DeclarationNameInfo,
        range: SourceRange,
    ) -> DeclId {
        self.ctx.add_decl(Decl { kind, name, range })
    }

    pub fn top_level(&mut self, decl: DeclId) {
        self.ctx.add_top_level(decl);
    }

    pub fn var(
        &mut self,
        name: &str,
        name_loc: SourceLocation,
        ty: QualType,
        init: Option<ExprId>,
        range: SourceRange,
    ) -> DeclId {
        self.decl(
            DeclKind::Var { ty, init },
            DeclarationNameInfo::new(name, name_loc),
            range,
        )
    }

    /// Attach an initializer after the fact, for initializers that name the variable
    pub fn set_var_init(&mut self, var: DeclId, value: ExprId) {
        if let Some(Decl {
            kind: DeclKind::Var { init, .. },
            ..
        }) = self.ctx.decl_mut(var)
        {
            *init = Some(value);
        }
    }

    pub fn param(
        &mut self,
        name: &str,
        name_loc: SourceLocation,
        ty: QualType,
        range: SourceRange,
    ) -> DeclId {
        self.decl(
            DeclKind::ParmVar { ty },
            DeclarationNameInfo::new(name, name_loc),
            range,
        )
    }

    pub fn function(
        &mut self,
        name: &str,
        name_loc: SourceLocation,
        return_type: Type,
        params: Vec<DeclId>,
        body: Option<StmtId>,
        range: SourceRange,
    ) -> DeclId {
        self.decl(
            DeclKind::Function {
                return_type,
                params,
                body,
            },
            DeclarationNameInfo::new(name, name_loc),
            range,
        )
    }

    /// Class with no members yet; see `add_member`
    pub fn record(
        &mut self,
        name: &str,
        name_loc: SourceLocation,
        bases: Vec<BaseSpecifier>,
        range: SourceRange,
    ) -> DeclId {
        self.decl(
            DeclKind::Record {
                bases,
                members: Vec::new(),
            },
            DeclarationNameInfo::new(name, name_loc),
            range,
        )
    }

    pub fn add_member(&mut self, record: DeclId, member: DeclId) {
        if let Some(Decl {
            kind: DeclKind::Record { members, .. },
            ..
        }) = self.ctx.decl_mut(record)
        {
            members.push(member);
        }
    }

    pub fn field(
        &mut self,
        record: DeclId,
        name: &str,
        name_loc: SourceLocation,
        ty: QualType,
        range: SourceRange,
    ) -> DeclId {
        let field =
            self.decl(DeclKind::Field { ty }, DeclarationNameInfo::new(name, name_loc), range);
        self.add_member(record, field);
        field
    }

    #[allow(clippy::too_many_arguments)]
    pub fn method(
        &mut self,
        record: DeclId,
        name: &str,
        name_loc: SourceLocation,
        return_type: Type,
        params: Vec<DeclId>,
        is_const: bool,
        range: SourceRange,
    ) -> DeclId {
        let method = self.decl(
            DeclKind::Method {
                parent: record,
                return_type,
                params,
                body: None,
                is_const,
            },
            DeclarationNameInfo::new(name, name_loc),
            range,
        );
        self.add_member(record, method);
        method
    }

    /// Constructor named after its class
    pub fn constructor(
        &mut self,
        record: DeclId,
        params: Vec<DeclId>,
        explicit: ExplicitSpecifier,
        range: SourceRange,
    ) -> DeclId {
        let name = self.ctx[record].name.name.clone();
        let constructor = self.decl(
            DeclKind::Constructor {
                parent: record,
                params,
                body: None,
                explicit,
            },
            DeclarationNameInfo::new(&name, range.begin),
            range,
        );
        self.add_member(record, constructor);
        constructor
    }

    /// Conversion function `operator <target>`; `name_range` covers the written name
    pub fn conversion(
        &mut self,
        record: DeclId,
        target: Type,
        explicit: ExplicitSpecifier,
        is_const: bool,
        name_range: SourceRange,
        range: SourceRange,
    ) -> DeclId {
        let name = format!("operator {}", type_spelling(&target));
        let conversion = self.decl(
            DeclKind::Conversion {
                parent: record,
                target,
                body: None,
                explicit,
                is_const,
            },
            DeclarationNameInfo::with_end(&name, name_range.begin, name_range.end),
            range,
        );
        self.add_member(record, conversion);
        conversion
    }

    pub fn enum_decl(
        &mut self,
        name: &str,
        name_loc: SourceLocation,
        underlying: Type,
        range: SourceRange,
    ) -> DeclId {
        self.decl(
            DeclKind::Enum {
                underlying,
                constants: Vec::new(),
            },
            DeclarationNameInfo::new(name, name_loc),
            range,
        )
    }

    pub fn enum_constant(
        &mut self,
        parent: DeclId,
        name: &str,
        value: ApsInt,
        range: SourceRange,
    ) -> DeclId {
        let constant = self.decl(
            DeclKind::EnumConstant { value },
            DeclarationNameInfo::new(name, range.begin),
            range,
        );
        if let Some(Decl {
            kind: DeclKind::Enum { constants, .. },
            ..
        }) = self.ctx.decl_mut(parent)
        {
            constants.push(constant);
        }
        constant
    }
}

/// Type as written in an operator name: records and enums without their keyword
fn type_spelling(ty: &Type) -> String {
    match ty {
        Type::Record { name, .. } | Type::Enum { name, .. } => name.clone(),
        other => other.to_string(),
    }
}
