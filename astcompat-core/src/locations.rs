//! Node locations, language flags and explicit specifiers across schemas

use crate::schema::{revisions, ACTIVE};
use astcompat_ast::legacy::LegacyExplicitSpecified;
use astcompat_ast::{HasExplicitSpecifier, Located};
use astcompat_common::{LangOptions, SourceLocation};

pub mod legacy {
    use astcompat_ast::legacy::{LegacyExplicitSpecified, LegacyLocated};
    use astcompat_common::legacy::LegacyLangOptions;
    use astcompat_common::{LangOptions, SourceLocation};

    pub fn get_begin_loc<N: LegacyLocated + ?Sized>(node: &N) -> SourceLocation {
        node.loc_start()
    }

    pub fn get_end_loc<N: LegacyLocated + ?Sized>(node: &N) -> SourceLocation {
        node.loc_end()
    }

    pub fn is_cplusplus17(opts: &LangOptions) -> bool {
        opts.c_plus_plus1z()
    }

    pub fn is_explicit_specified<D: LegacyExplicitSpecified + ?Sized>(decl: &D) -> bool {
        decl.is_explicit_specified()
    }
}

pub mod current {
    use astcompat_ast::{HasExplicitSpecifier, Located};
    use astcompat_common::{LangOptions, SourceLocation};

    pub fn get_begin_loc<N: Located + ?Sized>(node: &N) -> SourceLocation {
        node.begin_loc()
    }

    pub fn get_end_loc<N: Located + ?Sized>(node: &N) -> SourceLocation {
        node.end_loc()
    }

    pub fn is_cplusplus17(opts: &LangOptions) -> bool {
        opts.c_plus_plus17
    }

    pub fn is_explicit_specified<D: HasExplicitSpecifier + ?Sized>(decl: &D) -> bool {
        decl.explicit_specifier().is_explicit()
    }
}

/// First location of a declaration, statement, expression, base specifier or name
pub fn get_begin_loc<N: Located + ?Sized>(node: &N) -> SourceLocation {
    if ACTIVE.at_least(revisions::BEGIN_END_LOC) {
        current::get_begin_loc(node)
    } else {
        legacy::get_begin_loc(node)
    }
}

/// Start of the last token of a node
pub fn get_end_loc<N: Located + ?Sized>(node: &N) -> SourceLocation {
    if ACTIVE.at_least(revisions::BEGIN_END_LOC) {
        current::get_end_loc(node)
    } else {
        legacy::get_end_loc(node)
    }
}

pub fn is_cplusplus17(opts: &LangOptions) -> bool {
    if ACTIVE.at_least(revisions::CPLUSPLUS17) {
        current::is_cplusplus17(opts)
    } else {
        legacy::is_cplusplus17(opts)
    }
}

/// Whether a constructor or conversion function is `explicit`
pub fn is_explicit_specified<D>(decl: &D) -> bool
where
    D: HasExplicitSpecifier + LegacyExplicitSpecified + ?Sized,
{
    if ACTIVE.at_least(revisions::EXPLICIT_SPECIFIER) {
        current::is_explicit_specified(decl)
    } else {
        legacy::is_explicit_specified(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astcompat_ast::samples;
    use astcompat_ast::Node;
    use astcompat_common::LangStandard;

    #[test]
    fn test_strategies_agree_on_sample_nodes() {
        for sample in samples::all_samples() {
            let ctx = &sample.unit.ast;
            for expr in ctx.exprs() {
                assert_eq!(legacy::get_begin_loc(&expr), current::get_begin_loc(&expr));
                assert_eq!(legacy::get_end_loc(&expr), current::get_end_loc(&expr));
            }
            for decl in ctx.top_level_decls() {
                let node = Node::from(decl);
                assert_eq!(legacy::get_begin_loc(&node), current::get_begin_loc(&node));
                assert_eq!(get_end_loc(&node), decl.end_loc());
            }
        }
    }

    #[test]
    fn test_cplusplus17_flag() {
        let standards = [
            LangStandard::Cxx14,
            LangStandard::Cxx17,
            LangStandard::Cxx20,
            LangStandard::C11,
        ];
        for standard in standards {
            let opts = LangOptions::for_standard(standard);
            assert_eq!(legacy::is_cplusplus17(&opts), current::is_cplusplus17(&opts));
            assert_eq!(is_cplusplus17(&opts), standard >= LangStandard::Cxx17);
        }
    }

    #[test]
    fn test_explicit_conversion_function() {
        let sample = samples::flag_conversions();
        let ctx = &sample.unit.ast;
        let flag = ctx.top_level_decls().next().unwrap();
        let members = flag.children();

        let constructor = members[0].as_constructor().unwrap();
        let conversion = members[1].as_conversion().unwrap();
        assert!(!is_explicit_specified(&constructor));
        assert!(is_explicit_specified(&conversion));
        assert_eq!(
            legacy::is_explicit_specified(&conversion),
            current::is_explicit_specified(&conversion)
        );
    }
}
