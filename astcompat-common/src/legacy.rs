//! Accessor surface of older host schema revisions
//!
//! Revisions before 7.0 returned expansion ranges as a plain pair of token
//! locations, and revisions before 6.0 spelled the C++17 flag `CPlusPlus1z`.
//! The host keeps serving those shapes so that adapters built against an older
//! schema still have something to call.

use crate::lang_options::LangOptions;
use crate::source_loc::SourceLocation;
use crate::source_manager::SourceManager;

pub trait LegacySourceManager {
    /// Immediate expansion bounds as a `(begin, end)` token pair
    fn immediate_expansion_range(&self, loc: SourceLocation) -> (SourceLocation, SourceLocation);
}

impl LegacySourceManager for SourceManager {
    fn immediate_expansion_range(&self, loc: SourceLocation) -> (SourceLocation, SourceLocation) {
        match self.expansion_info(loc) {
            Some(info) => (info.expansion_start, info.expansion_end),
            None => (loc, loc),
        }
    }
}

pub trait LegacyLangOptions {
    fn c_plus_plus1z(&self) -> bool;
}

impl LegacyLangOptions for LangOptions {
    fn c_plus_plus1z(&self) -> bool {
        self.c_plus_plus17
    }
}
