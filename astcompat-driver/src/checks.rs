//! Checks the driver runs over a translation unit
//!
//! Each check is a traversal that hands the nodes it collects to the
//! normalization layer: casts are reported by the operand the programmer
//! wrote, conditions by their folded value, declarations by their extent.

use crate::report::{Category, Report};
use astcompat_ast::ast::StmtKind;
use astcompat_ast::visit::{self, Visitor};
use astcompat_ast::{CastKind, CastNode, DeclNode, ExprNode, StmtNode, TranslationUnit};
use astcompat_common::CompatError;
use astcompat_core::{
    evaluate_as_int, get_begin_loc, get_end_loc, get_immediate_expansion_range,
    get_sub_expr_as_written, ignore_implicit, is_cplusplus17, is_explicit_specified,
    is_point_within, ACTIVE,
};
use clap::ValueEnum;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Check {
    Casts,
    Constants,
    Locations,
    All,
}

impl Check {
    fn includes(self, category: Category) -> bool {
        match self {
            Check::All => true,
            Check::Casts => category == Category::Casts,
            Check::Constants => category == Category::Constants,
            Check::Locations => category == Category::Locations,
        }
    }
}

/// Run `check` over `unit`. A contract violation aborts the run.
pub fn run_checks(unit: &TranslationUnit, name: &str, check: Check) -> Result<Report, CompatError> {
    let mut report = Report::new(
        name,
        ACTIVE.to_string(),
        unit.lang_options.standard().to_string(),
        is_cplusplus17(&unit.lang_options),
    );
    if check.includes(Category::Casts) {
        check_casts(unit, &mut report)?;
    }
    if check.includes(Category::Constants) {
        check_constants(unit, &mut report);
    }
    if check.includes(Category::Locations) {
        check_locations(unit, &mut report);
    }
    debug!(
        "{}: {} cast, {} constant and {} location finding(s)",
        name,
        report.count(Category::Casts),
        report.count(Category::Constants),
        report.count(Category::Locations)
    );
    Ok(report)
}

/// Written casts, plus implicit conversions that run user code
#[derive(Default)]
struct CastCollector<'a> {
    casts: Vec<CastNode<'a>>,
}

impl<'a> Visitor<'a> for CastCollector<'a> {
    fn visit_expr(&mut self, expr: ExprNode<'a>) {
        if let Some(cast) = expr.as_cast() {
            let through_user_code = matches!(
                cast.cast_kind(),
                CastKind::ConstructorConversion | CastKind::UserDefinedConversion
            );
            if !cast.is_implicit() || through_user_code {
                self.casts.push(cast);
            }
        }
        visit::walk_expr(self, expr);
    }
}

fn check_casts(unit: &TranslationUnit, report: &mut Report) -> Result<(), CompatError> {
    let mut collector = CastCollector::default();
    visit::walk_context(&mut collector, &unit.ast);

    for cast in collector.casts {
        let expr = cast.as_expr();
        let written = get_sub_expr_as_written(cast)?;
        report.push(
            Category::Casts,
            unit.describe(get_begin_loc(&expr)),
            format!(
                "{} ({}) written as {} at {}..{}",
                expr.kind_name(),
                cast.cast_kind(),
                written.kind_name(),
                unit.describe(get_begin_loc(&written)),
                unit.describe(get_end_loc(&written))
            ),
        );
    }
    Ok(())
}

/// Conditions of `if` and `while` statements
#[derive(Default)]
struct ConditionCollector<'a> {
    conditions: Vec<(&'static str, ExprNode<'a>)>,
}

impl<'a> Visitor<'a> for ConditionCollector<'a> {
    fn visit_stmt(&mut self, stmt: StmtNode<'a>) {
        let ctx = stmt.context();
        match stmt.kind() {
            StmtKind::If { cond, .. } => self.conditions.push(("if", ctx.expr(*cond))),
            StmtKind::While { cond, .. } => self.conditions.push(("while", ctx.expr(*cond))),
            _ => {}
        }
        visit::walk_stmt(self, stmt);
    }
}

fn check_constants(unit: &TranslationUnit, report: &mut Report) {
    let mut collector = ConditionCollector::default();
    visit::walk_context(&mut collector, &unit.ast);

    for (keyword, cond) in collector.conditions {
        // fold what was written, not its conversion to bool
        let written = ignore_implicit(cond);
        let location = unit.describe(get_begin_loc(&written));
        match evaluate_as_int(written) {
            Some(value) => report.push(
                Category::Constants,
                location,
                format!("{} condition is always {}", keyword, value),
            ),
            None => trace!("{} condition at {} is not constant", keyword, location),
        }
    }
}

/// Outermost expressions whose first token comes from a macro expansion
#[derive(Default)]
struct MacroCollector<'a> {
    exprs: Vec<ExprNode<'a>>,
}

impl<'a> Visitor<'a> for MacroCollector<'a> {
    fn visit_expr(&mut self, expr: ExprNode<'a>) {
        if get_begin_loc(&expr).is_macro_id() {
            self.exprs.push(expr);
        } else {
            visit::walk_expr(self, expr);
        }
    }
}

fn check_locations(unit: &TranslationUnit, report: &mut Report) {
    let sm = &unit.source_manager;
    for decl in unit.ast.top_level_decls() {
        let (begin, end) = (get_begin_loc(&decl), get_end_loc(&decl));
        report.push(
            Category::Locations,
            unit.describe(begin),
            format!("{} '{}' ends at {}", decl.kind_name(), decl.name(), unit.describe(end)),
        );

        for member in decl.children() {
            report_explicit(unit, member, report);
        }

        let mut collector = MacroCollector::default();
        collector.visit_decl(decl);
        for expr in collector.exprs {
            let (expansion_begin, expansion_end) =
                get_immediate_expansion_range(sm, get_begin_loc(&expr));
            let inside = is_point_within(sm, expansion_begin, begin, end);
            report.push(
                Category::Locations,
                unit.describe(expansion_begin),
                format!(
                    "{} starts in a macro expansion ending at {}{}",
                    expr.kind_name(),
                    unit.describe(expansion_end),
                    if inside { "" } else { ", outside its declaration" }
                ),
            );
        }
    }
}

fn report_explicit(unit: &TranslationUnit, member: DeclNode<'_>, report: &mut Report) {
    let explicit = if let Some(constructor) = member.as_constructor() {
        is_explicit_specified(&constructor)
    } else if let Some(conversion) = member.as_conversion() {
        is_explicit_specified(&conversion)
    } else {
        return;
    };
    report.push(
        Category::Locations,
        unit.describe(get_begin_loc(&member)),
        format!(
            "{} '{}' is {}",
            member.kind_name(),
            member.name(),
            if explicit { "explicit" } else { "not explicit" }
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use astcompat_ast::{samples, AstBuilder, Type};
    use astcompat_common::{LangOptions, LangStandard, SourceLocation, SourceManager, SourceRange};
    use pretty_assertions::assert_eq;

    fn messages(report: &Report, category: Category) -> Vec<String> {
        report
            .findings
            .iter()
            .filter(|finding| finding.category == category)
            .map(|finding| format!("{}: {}", finding.location, finding.message))
            .collect()
    }

    #[test]
    fn test_casts_report_written_operand() {
        let sample = samples::user_conversion();
        let report = run_checks(&sample.unit, sample.name, Check::Casts).unwrap();
        let written = "written as DeclRefExpr at resstring.cxx:9:28..resstring.cxx:9:30";
        assert_eq!(
            messages(&report, Category::Casts),
            vec![
                format!("resstring.cxx:9:5: CXXStaticCastExpr (ConstructorConversion) {written}"),
                format!("resstring.cxx:9:28: ImplicitCastExpr (UserDefinedConversion) {written}"),
            ]
        );
    }

    #[test]
    fn test_constants_report_folded_conditions() {
        let sample = samples::constants();
        let report = run_checks(&sample.unit, sample.name, Check::Constants).unwrap();
        assert_eq!(
            messages(&report, Category::Constants),
            vec![
                "constants.cxx:4:9: if condition is always 5".to_string(),
                "constants.cxx:8:9: if condition is always 8".to_string(),
            ]
        );
        assert_eq!(report.count(Category::Casts), 0);
    }

    #[test]
    fn test_locations_report_explicit_members() {
        let sample = samples::flag_conversions();
        let report = run_checks(&sample.unit, sample.name, Check::Locations).unwrap();
        let found = messages(&report, Category::Locations);
        let has = |message: &str| found.iter().any(|finding| finding == message);
        assert!(has("flag.cxx:2:5: CXXConstructorDecl 'Flag' is not explicit"));
        assert!(has("flag.cxx:3:5: CXXConversionDecl 'operator bool' is explicit"));
        assert!(report.cplusplus17);
    }

    #[test]
    fn test_locations_report_macro_expansions() {
        let sample = samples::macro_expansion();
        let report = run_checks(&sample.unit, sample.name, Check::Locations).unwrap();
        let found = messages(&report, Category::Locations);
        let has = |message: &str| found.iter().any(|finding| finding == message);
        assert!(has(
            "macros.c:3:13: BinaryOperator starts in a macro expansion ending at macros.c:3:13"
        ));
        assert!(has(
            "macros.c:4:11: IntegerLiteral starts in a macro expansion ending at macros.c:4:14"
        ));
        assert!(!found.iter().any(|m| m.contains("outside its declaration")));
        assert!(!report.cplusplus17);
    }

    #[test]
    fn test_all_checks_run_on_every_sample() {
        for sample in samples::all_samples() {
            let report = run_checks(&sample.unit, sample.name, Check::All).unwrap();
            assert!(report.count(Category::Locations) > 0, "{}", sample.name);
        }
    }

    #[test]
    fn test_contract_violation_aborts() {
        let mut sm = SourceManager::new();
        let file = sm.add_file("bad.cxx", "int v = 1;\n", SourceLocation::INVALID);
        let loc = sm.location(file, 8);
        let mut b = AstBuilder::new();
        let lit = b.integer_literal(1, Type::Int, SourceRange::from_location(loc));
        let bad = b.implicit_cast(CastKind::ConstructorConversion, lit, Type::Int);
        let var = b.var(
            "v",
            sm.location(file, 4),
            Type::Int.into(),
            Some(bad),
            SourceRange::new(sm.location(file, 0), loc),
        );
        b.top_level(var);
        let unit =
            TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish());

        assert!(matches!(
            run_checks(&unit, "bad", Check::Casts),
            Err(CompatError::ContractViolation { .. })
        ));
        assert!(run_checks(&unit, "bad", Check::Constants).is_ok());
    }
}
