//! A translation unit: the tree together with the services it was built against

use crate::context::AstContext;
use astcompat_common::{CompatError, LangOptions, SourceLocation, SourceManager};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub source_manager: SourceManager,
    pub lang_options: LangOptions,
    pub ast: AstContext,
}

impl TranslationUnit {
    pub fn new(source_manager: SourceManager, lang_options: LangOptions, ast: AstContext) -> Self {
        Self {
            source_manager,
            lang_options,
            ast,
        }
    }

    /// Parse a serialized unit and check its invariants
    pub fn from_json(json: &str) -> Result<Self, CompatError> {
        let unit: TranslationUnit = serde_json::from_str(json)?;
        unit.validate()?;
        debug!(
            "loaded translation unit: {} declarations, {} statements, {} expressions",
            unit.ast.decl_count(),
            unit.ast.stmt_count(),
            unit.ast.expr_count()
        );
        Ok(unit)
    }

    pub fn to_json(&self) -> Result<String, CompatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), CompatError> {
        self.source_manager.validate()?;
        self.ast.validate()
    }

    /// `file:line:column` of a location, for diagnostics
    pub fn describe(&self, loc: SourceLocation) -> String {
        match self.source_manager.presumed_loc(loc) {
            Some(presumed) => presumed.to_string(),
            None => "<invalid loc>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AstBuilder;
    use crate::types::Type;
    use astcompat_common::{LangStandard, SourceRange};

    fn unit() -> TranslationUnit {
        let mut sm = SourceManager::new();
        let file = sm.add_file("main.cxx", "int x = 2;\n", SourceLocation::INVALID);
        let mut b = AstBuilder::new();
        let init =
            b.integer_literal(2, Type::Int, SourceRange::from_location(sm.location(file, 8)));
        let x = b.var(
            "x",
            sm.location(file, 4),
            Type::Int.into(),
            Some(init),
            SourceRange::new(sm.location(file, 0), sm.location(file, 8)),
        );
        b.top_level(x);
        TranslationUnit::new(sm, LangOptions::for_standard(LangStandard::Cxx17), b.finish())
    }

    #[test]
    fn test_json_round_trip() {
        let original = unit();
        let json = original.to_json().unwrap();
        let loaded = TranslationUnit::from_json(&json).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            TranslationUnit::from_json("{\"ast\": 3}"),
            Err(CompatError::Json { .. })
        ));
    }

    #[test]
    fn test_rejects_cyclic_declarations() {
        let mut cyclic = unit();
        let mut b = AstBuilder::new();
        let rec = b.record("Loop", SourceLocation::INVALID, Vec::new(), SourceRange::default());
        b.add_member(rec, rec);
        b.top_level(rec);
        cyclic.ast = b.finish();

        let json = cyclic.to_json().unwrap();
        assert!(matches!(
            TranslationUnit::from_json(&json),
            Err(CompatError::MalformedAst { .. })
        ));
    }

    #[test]
    fn test_describe_location() {
        let unit = unit();
        let file = unit.source_manager.main_file_id().unwrap();
        assert_eq!(unit.describe(unit.source_manager.location(file, 4)), "main.cxx:1:5");
        assert_eq!(unit.describe(SourceLocation::INVALID), "<invalid loc>");
    }
}
