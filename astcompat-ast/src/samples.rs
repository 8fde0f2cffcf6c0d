//! Built-in translation units
//!
//! Small elaborated trees with the shapes the normalization layer exists for:
//! conversions through constructors and conversion functions, chains of
//! implicit nodes, foldable and non-foldable conditions, and tokens produced
//! by macro expansion. The driver's `demo` command and the tests use them.

use crate::ast::{BinaryOp, CastKind, ExplicitSpecifier, ExprId};
use crate::builder::AstBuilder;
use crate::types::{QualType, Type};
use crate::unit::TranslationUnit;
use astcompat_common::{
    FileId, LangOptions, LangStandard, SourceLocation, SourceManager, SourceRange,
};

pub const SAMPLE_NAMES: [&str; 5] = [
    "user-conversion",
    "flag-conversions",
    "implicit-chain",
    "constants",
    "macro-expansion",
];

#[derive(Debug, Clone)]
pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: TranslationUnit,
    marks: Vec<(&'static str, ExprId)>,
}

impl Sample {
    /// Expression labelled `label` when the sample was built
    pub fn mark(&self, label: &str) -> Option<ExprId> {
        self.marks
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, id)| *id)
    }

    pub fn marks(&self) -> &[(&'static str, ExprId)] {
        &self.marks
    }
}

pub fn sample(name: &str) -> Option<Sample> {
    match name {
        "user-conversion" => Some(user_conversion()),
        "flag-conversions" => Some(flag_conversions()),
        "implicit-chain" => Some(implicit_chain()),
        "constants" => Some(constants()),
        "macro-expansion" => Some(macro_expansion()),
        _ => None,
    }
}

pub fn all_samples() -> Vec<Sample> {
    SAMPLE_NAMES.iter().filter_map(|name| sample(name)).collect()
}

/// Source text of a sample file and helpers to find locations in it
struct SampleText {
    file: FileId,
    text: &'static str,
}

impl SampleText {
    fn load(sm: &mut SourceManager, name: &str, text: &'static str) -> Self {
        let file = sm.add_file(name, text, SourceLocation::INVALID);
        Self { file, text }
    }

    fn at(&self, sm: &SourceManager, offset: Option<usize>) -> SourceLocation {
        match offset {
            Some(offset) => sm.location(self.file, offset as u32),
            None => SourceLocation::INVALID,
        }
    }

    /// Offset of `needle` within the first occurrence of `context`
    fn offset_in(&self, context: &str, needle: &str) -> Option<usize> {
        let base = self.text.find(context)?;
        Some(base + self.text[base..].find(needle)?)
    }

    fn loc_in(&self, sm: &SourceManager, context: &str, needle: &str) -> SourceLocation {
        self.at(sm, self.offset_in(context, needle))
    }

    fn range_in(&self, sm: &SourceManager, context: &str, needle: &str) -> SourceRange {
        let begin = self.offset_in(context, needle);
        let end = begin.map(|begin| begin + needle.len().saturating_sub(1));
        SourceRange::new(self.at(sm, begin), self.at(sm, end))
    }

    fn range(&self, sm: &SourceManager, needle: &str) -> SourceRange {
        self.range_in(sm, needle, needle)
    }

    /// From the start of `first` to the last character of the next `last`
    fn span(&self, sm: &SourceManager, first: &str, last: &str) -> SourceRange {
        let begin = self.text.find(first);
        let end = begin.and_then(|begin| {
            self.text[begin..]
                .find(last)
                .map(|rel| begin + rel + last.len().saturating_sub(1))
        });
        SourceRange::new(self.at(sm, begin), self.at(sm, end))
    }
}

fn record_type(name: &str, decl: crate::ast::DeclId) -> Type {
    Type::Record {
        name: name.to_string(),
        decl: Some(decl),
    }
}

const USER_CONVERSION_SOURCE: &str = "\
struct ResString {
    ResString(ResString &&);
};
struct ErrorResource_Impl {
    operator ResString();
};
void GetClassString() {
    ErrorResource_Impl aEr;
    static_cast<ResString>(aEr);
}
";

/// A static cast whose operand goes through a conversion function, then a
/// temporary, then the move constructor of the target class
pub fn user_conversion() -> Sample {
    let mut sm = SourceManager::new();
    let src = SampleText::load(&mut sm, "resstring.cxx", USER_CONVERSION_SOURCE);
    let mut b = AstBuilder::new();

    let res_string = b.record(
        "ResString",
        src.loc_in(&sm, "struct ResString", "ResString"),
        Vec::new(),
        src.span(&sm, "struct ResString", "}"),
    );
    let res_string_ty = record_type("ResString", res_string);
    let move_param = b.param(
        "",
        SourceLocation::INVALID,
        Type::RValueReference(Box::new(res_string_ty.clone())).into(),
        src.range_in(&sm, "ResString(ResString &&)", "ResString &&"),
    );
    let move_ctor = b.constructor(
        res_string,
        vec![move_param],
        ExplicitSpecifier::none(),
        src.range(&sm, "ResString(ResString &&)"),
    );

    let impl_record = b.record(
        "ErrorResource_Impl",
        src.loc_in(&sm, "struct ErrorResource_Impl", "ErrorResource_Impl"),
        Vec::new(),
        src.span(&sm, "struct ErrorResource_Impl", "}"),
    );
    let impl_ty = record_type("ErrorResource_Impl", impl_record);
    let conversion = b.conversion(
        impl_record,
        res_string_ty.clone(),
        ExplicitSpecifier::none(),
        false,
        SourceRange::new(
            src.loc_in(&sm, "operator ResString", "operator"),
            src.loc_in(&sm, "operator ResString", "ResString"),
        ),
        src.range(&sm, "operator ResString()"),
    );

    let a_er = b.var(
        "aEr",
        src.loc_in(&sm, "ErrorResource_Impl aEr", "aEr"),
        impl_ty.clone().into(),
        None,
        src.range(&sm, "ErrorResource_Impl aEr"),
    );
    let decl_stmt = b.decl_stmt(vec![a_er], src.range(&sm, "ErrorResource_Impl aEr;"));

    let operand = src.range_in(&sm, "static_cast<ResString>(aEr)", "aEr");
    let written = b.decl_ref(a_er, impl_ty, operand);
    let member = b.member(written, conversion, false, Type::BoundMember, operand);
    let conversion_call = b.member_call(member, Vec::new(), res_string_ty.clone(), operand);
    let user_defined =
        b.implicit_cast(CastKind::UserDefinedConversion, conversion_call, res_string_ty.clone());
    let inner_bind = b.bind_temporary(user_defined);
    let temporary = b.materialize_temporary(inner_bind);
    let construct = b.construct(move_ctor, vec![temporary], true, res_string_ty.clone(), operand);
    let outer_bind = b.bind_temporary(construct);
    let cast = b.static_cast(
        CastKind::ConstructorConversion,
        outer_bind,
        res_string_ty,
        src.range(&sm, "static_cast<ResString>(aEr)"),
    );
    let full = b.expr_with_cleanups(cast);
    let expr_stmt = b.expr_stmt(full);

    let body =
        b.compound(vec![decl_stmt, expr_stmt], src.span(&sm, "{\n    ErrorResource_Impl", "}"));
    let function = b.function(
        "GetClassString",
        src.loc_in(&sm, "void GetClassString", "GetClassString"),
        Type::Void,
        Vec::new(),
        Some(body),
        src.span(&sm, "void GetClassString", "(aEr);\n}"),
    );

    b.top_level(res_string);
    b.top_level(impl_record);
    b.top_level(function);

    Sample {
        name: "user-conversion",
        description: "static_cast<ResString>(aEr) via 'operator ResString' and a move",
        unit: TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish()),
        marks: vec![
            ("cast", cast),
            ("written", written),
            ("construct", construct),
            ("conversion-call", conversion_call),
            ("full-expression", full),
        ],
    }
}

const FLAG_SOURCE: &str = "\
struct Flag {
    Flag(int);
    explicit operator bool() const;
};
void take(Flag);
void caller(Flag flag) {
    take(42);
    if (flag) {
    }
}
";

/// An argument converted through a converting constructor, and a condition
/// converted through an explicit conversion function
pub fn flag_conversions() -> Sample {
    let mut sm = SourceManager::new();
    let src = SampleText::load(&mut sm, "flag.cxx", FLAG_SOURCE);
    let mut b = AstBuilder::new();

    let flag = b.record(
        "Flag",
        src.loc_in(&sm, "struct Flag", "Flag"),
        Vec::new(),
        src.span(&sm, "struct Flag", "}"),
    );
    let flag_ty = record_type("Flag", flag);
    let int_param = b.param(
        "",
        SourceLocation::INVALID,
        Type::Int.into(),
        src.range_in(&sm, "Flag(int)", "int"),
    );
    let constructor = b.constructor(
        flag,
        vec![int_param],
        ExplicitSpecifier::none(),
        src.range(&sm, "Flag(int)"),
    );
    let to_bool = b.conversion(
        flag,
        Type::Bool,
        ExplicitSpecifier::explicit(),
        true,
        SourceRange::new(
            src.loc_in(&sm, "operator bool", "operator"),
            src.loc_in(&sm, "operator bool", "bool"),
        ),
        src.range(&sm, "explicit operator bool() const"),
    );

    let take_param = b.param(
        "",
        SourceLocation::INVALID,
        flag_ty.clone().into(),
        src.range_in(&sm, "take(Flag)", "Flag"),
    );
    let take_ty = Type::Function {
        return_type: Box::new(Type::Void),
        parameters: vec![flag_ty.clone()],
        is_variadic: false,
    };
    let take = b.function(
        "take",
        src.loc_in(&sm, "void take", "take"),
        Type::Void,
        vec![take_param],
        None,
        src.range(&sm, "void take(Flag)"),
    );

    let flag_param = b.param(
        "flag",
        src.loc_in(&sm, "Flag flag", "flag"),
        flag_ty.clone().into(),
        src.range(&sm, "Flag flag"),
    );

    let take_ref = b.decl_ref(take, take_ty.clone(), src.range_in(&sm, "take(42)", "take"));
    let callee = b.implicit_cast(
        CastKind::FunctionToPointerDecay,
        take_ref,
        Type::Pointer(Box::new(take_ty)),
    );
    let argument_range = src.range_in(&sm, "take(42)", "42");
    let argument = b.integer_literal(42, Type::Int, argument_range);
    let construct =
        b.construct(constructor, vec![argument], false, flag_ty.clone(), argument_range);
    let constructor_conversion =
        b.implicit_cast(CastKind::ConstructorConversion, construct, flag_ty.clone());
    let call = b.call(callee, vec![constructor_conversion], Type::Void, src.range(&sm, "take(42)"));
    let call_stmt = b.expr_stmt(call);

    let condition_range = src.range_in(&sm, "if (flag)", "flag");
    let receiver = b.decl_ref(flag_param, flag_ty, condition_range);
    let member = b.member(receiver, to_bool, false, Type::BoundMember, condition_range);
    let member_call = b.member_call(member, Vec::new(), Type::Bool, condition_range);
    let bool_conversion = b.implicit_cast(CastKind::UserDefinedConversion, member_call, Type::Bool);
    let then_stmt = b.compound(Vec::new(), src.span(&sm, "{\n    }", "}"));
    let if_stmt = b.if_stmt(bool_conversion, then_stmt, None, src.span(&sm, "if (flag)", "}"));

    let body = b.compound(vec![call_stmt, if_stmt], src.span(&sm, "{\n    take", "}\n}"));
    let caller = b.function(
        "caller",
        src.loc_in(&sm, "void caller", "caller"),
        Type::Void,
        vec![flag_param],
        Some(body),
        src.span(&sm, "void caller", "}\n}"),
    );

    b.top_level(flag);
    b.top_level(take);
    b.top_level(caller);

    Sample {
        name: "flag-conversions",
        description: "take(42) through Flag(int), and if (flag) through 'explicit operator bool'",
        unit: TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish()),
        marks: vec![
            ("constructor-conversion", constructor_conversion),
            ("argument", argument),
            ("bool-conversion", bool_conversion),
            ("receiver", receiver),
        ],
    }
}

const IMPLICIT_CHAIN_SOURCE: &str = "\
struct S {
    S(const S &);
};
void use(S s) {
    const S &r = s;
}
";

/// Implicit cast over a bound, materialized temporary over another implicit cast
pub fn implicit_chain() -> Sample {
    let mut sm = SourceManager::new();
    let src = SampleText::load(&mut sm, "chain.cxx", IMPLICIT_CHAIN_SOURCE);
    let mut b = AstBuilder::new();

    let record = b.record(
        "S",
        src.loc_in(&sm, "struct S", "S"),
        Vec::new(),
        src.span(&sm, "struct S", "}"),
    );
    let s_ty = record_type("S", record);
    let copy_param = b.param(
        "",
        SourceLocation::INVALID,
        Type::LValueReference(Box::new(s_ty.clone())).into(),
        src.range_in(&sm, "S(const S &)", "const S &"),
    );
    b.constructor(
        record,
        vec![copy_param],
        ExplicitSpecifier::none(),
        src.range(&sm, "S(const S &)"),
    );

    let s_param = b.param(
        "s",
        src.loc_in(&sm, "(S s)", "s"),
        s_ty.clone().into(),
        src.range_in(&sm, "(S s)", "S s"),
    );
    let plain = b.decl_ref(s_param, s_ty.clone(), src.range_in(&sm, "= s;", "s"));
    let inner = b.implicit_cast(CastKind::NoOp, plain, QualType::constant(s_ty.clone()));
    let temporary = b.materialize_temporary(inner);
    let bound = b.bind_temporary(temporary);
    let outer = b.implicit_cast(CastKind::NoOp, bound, QualType::constant(s_ty.clone()));

    let r = b.var(
        "r",
        src.loc_in(&sm, "&r", "r"),
        Type::LValueReference(Box::new(s_ty)).into(),
        Some(outer),
        src.range(&sm, "const S &r = s"),
    );
    let decl_stmt = b.decl_stmt(vec![r], src.range(&sm, "const S &r = s;"));
    let body = b.compound(vec![decl_stmt], src.span(&sm, "{\n    const", "}"));
    let function = b.function(
        "use",
        src.loc_in(&sm, "void use", "use"),
        Type::Void,
        vec![s_param],
        Some(body),
        src.span(&sm, "void use", "s;\n}"),
    );

    b.top_level(record);
    b.top_level(function);

    Sample {
        name: "implicit-chain",
        description: "ImplicitCast -> BindTemporary -> MaterializeTemporary -> ImplicitCast -> s",
        unit: TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish()),
        marks: vec![("outer", outer), ("plain", plain)],
    }
}

const CONSTANTS_SOURCE: &str = "\
int x = 1;
const int limit = 4;
void check() {
    if (2 + 3) {
    }
    while (x + 1) {
    }
    if (limit * 2) {
    }
}
";

/// Conditions that fold, and one that reads a mutable variable
pub fn constants() -> Sample {
    let mut sm = SourceManager::new();
    let src = SampleText::load(&mut sm, "constants.cxx", CONSTANTS_SOURCE);
    let mut b = AstBuilder::new();

    let x_init = b.integer_literal(1, Type::Int, src.range_in(&sm, "x = 1", "1"));
    let x = b.var(
        "x",
        src.loc_in(&sm, "int x", "x"),
        Type::Int.into(),
        Some(x_init),
        src.range(&sm, "int x = 1"),
    );
    let limit_init = b.integer_literal(4, Type::Int, src.range_in(&sm, "limit = 4", "4"));
    let limit = b.var(
        "limit",
        src.loc_in(&sm, "int limit", "limit"),
        QualType::constant(Type::Int),
        Some(limit_init),
        src.range(&sm, "const int limit = 4"),
    );

    let two = b.integer_literal(2, Type::Int, src.range_in(&sm, "2 + 3", "2"));
    let three = b.integer_literal(3, Type::Int, src.range_in(&sm, "2 + 3", "3"));
    let sum = b.binary(BinaryOp::Add, two, three, Type::Int);
    let sum_cond = b.implicit_cast(CastKind::IntegralToBoolean, sum, Type::Bool);
    let sum_then = b.compound(Vec::new(), src.span(&sm, "(2 + 3) {", "}"));
    let sum_if = b.if_stmt(sum_cond, sum_then, None, src.span(&sm, "if (2 + 3)", "}"));

    let x_ref = b.decl_ref(x, Type::Int, src.range_in(&sm, "(x + 1)", "x"));
    let x_load = b.implicit_cast(CastKind::LValueToRValue, x_ref, Type::Int);
    let one = b.integer_literal(1, Type::Int, src.range_in(&sm, "x + 1", "1"));
    let mutable = b.binary(BinaryOp::Add, x_load, one, Type::Int);
    let mutable_cond = b.implicit_cast(CastKind::IntegralToBoolean, mutable, Type::Bool);
    let loop_body = b.compound(Vec::new(), src.span(&sm, "(x + 1) {", "}"));
    let while_stmt = b.while_stmt(mutable_cond, loop_body, src.span(&sm, "while (x + 1)", "}"));

    let limit_ref =
        b.decl_ref(limit, QualType::constant(Type::Int), src.range_in(&sm, "(limit * 2)", "limit"));
    let limit_load = b.implicit_cast(CastKind::LValueToRValue, limit_ref, Type::Int);
    let factor = b.integer_literal(2, Type::Int, src.range_in(&sm, "limit * 2", "2"));
    let scaled = b.binary(BinaryOp::Mul, limit_load, factor, Type::Int);
    let scaled_cond = b.implicit_cast(CastKind::IntegralToBoolean, scaled, Type::Bool);
    let scaled_then = b.compound(Vec::new(), src.span(&sm, "(limit * 2) {", "}"));
    let scaled_if = b.if_stmt(scaled_cond, scaled_then, None, src.span(&sm, "if (limit * 2)", "}"));

    let body = b.compound(
        vec![sum_if, while_stmt, scaled_if],
        src.span(&sm, "{\n    if (2 + 3)", "}\n}"),
    );
    let function = b.function(
        "check",
        src.loc_in(&sm, "void check", "check"),
        Type::Void,
        Vec::new(),
        Some(body),
        src.span(&sm, "void check", "}\n}"),
    );

    b.top_level(x);
    b.top_level(limit);
    b.top_level(function);

    Sample {
        name: "constants",
        description: "if (2 + 3), while (x + 1) with mutable x, if (limit * 2) with const limit",
        unit: TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish()),
        marks: vec![("sum", sum), ("mutable", mutable), ("scaled", scaled)],
    }
}

const MACRO_SOURCE: &str = "\
#define TWO 2
#define ONE 1
int three = TWO + 1;
int one = ONE;
";

/// Literals whose tokens come out of macro expansions
pub fn macro_expansion() -> Sample {
    let mut sm = SourceManager::new();
    let src = SampleText::load(&mut sm, "macros.c", MACRO_SOURCE);

    let two_use = src.loc_in(&sm, "= TWO", "TWO");
    let two = sm.add_expansion(
        src.loc_in(&sm, "#define TWO 2", "2"),
        SourceRange::new(two_use, two_use),
        1,
        true,
    );
    let one_use = src.range_in(&sm, "= ONE", "ONE");
    // character range: the end is one past the last character
    let one = sm.add_expansion(
        src.loc_in(&sm, "#define ONE 1", "1"),
        SourceRange::new(one_use.begin, one_use.end.with_offset(1)),
        1,
        false,
    );

    let mut b = AstBuilder::new();
    let expanded = b.integer_literal(2, Type::Int, SourceRange::from_location(two));
    let literal = b.integer_literal(1, Type::Int, src.range_in(&sm, "TWO + 1", "1"));
    let sum = b.binary(BinaryOp::Add, expanded, literal, Type::Int);
    let three = b.var(
        "three",
        src.loc_in(&sm, "int three", "three"),
        Type::Int.into(),
        Some(sum),
        src.span(&sm, "int three", "1;"),
    );
    let char_expanded = b.integer_literal(1, Type::Int, SourceRange::from_location(one));
    let one_var = b.var(
        "one",
        src.loc_in(&sm, "int one", "one"),
        Type::Int.into(),
        Some(char_expanded),
        src.range(&sm, "int one = ONE"),
    );

    b.top_level(three);
    b.top_level(one_var);

    Sample {
        name: "macro-expansion",
        description: "TWO + 1 and ONE, with TWO a token-range and ONE a character-range expansion",
        unit: TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::C11), b.finish()),
        marks: vec![
            ("expanded", expanded),
            ("sum", sum),
            ("char-expanded", char_expanded),
        ],
    }
}
