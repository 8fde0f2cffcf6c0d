//! Macro expansion ranges and containment of locations

use crate::schema::{revisions, ACTIVE};
use astcompat_common::{SourceLocation, SourceManager};

pub mod legacy {
    use astcompat_common::legacy::LegacySourceManager;
    use astcompat_common::{SourceLocation, SourceManager};

    pub fn get_immediate_expansion_range(
        sm: &SourceManager,
        loc: SourceLocation,
    ) -> (SourceLocation, SourceLocation) {
        LegacySourceManager::immediate_expansion_range(sm, loc)
    }

    /// Containment from two ordering queries plus equality at both ends
    pub fn is_point_within(
        sm: &SourceManager,
        loc: SourceLocation,
        start: SourceLocation,
        end: SourceLocation,
    ) -> bool {
        loc == start
            || loc == end
            || (sm.is_before_in_translation_unit(start, loc)
                && sm.is_before_in_translation_unit(loc, end))
    }
}

pub mod current {
    use astcompat_common::{SourceLocation, SourceManager};
    use log::trace;

    pub fn get_immediate_expansion_range(
        sm: &SourceManager,
        loc: SourceLocation,
    ) -> (SourceLocation, SourceLocation) {
        let range = sm.immediate_expansion_range(loc);
        if range.is_char_range() {
            // TODO: a character range ends one past its last character; callers
            // get that end as if it were a token start until they accept ranges
            trace!("approximating character expansion range {} as a token range", range.range);
        }
        (range.begin(), range.end())
    }

    pub fn is_point_within(
        sm: &SourceManager,
        loc: SourceLocation,
        start: SourceLocation,
        end: SourceLocation,
    ) -> bool {
        sm.is_point_within(loc, start, end)
    }
}

/// Bounds of the macro expansion that immediately produced `loc`; a file
/// location is its own expansion
pub fn get_immediate_expansion_range(
    sm: &SourceManager,
    loc: SourceLocation,
) -> (SourceLocation, SourceLocation) {
    if ACTIVE.at_least(revisions::CHAR_EXPANSION_RANGE) {
        current::get_immediate_expansion_range(sm, loc)
    } else {
        legacy::get_immediate_expansion_range(sm, loc)
    }
}

/// Whether `loc` lies in `[start, end]` in translation-unit order
pub fn is_point_within(
    sm: &SourceManager,
    loc: SourceLocation,
    start: SourceLocation,
    end: SourceLocation,
) -> bool {
    if ACTIVE.at_least(revisions::POINT_WITHIN) {
        current::is_point_within(sm, loc, start, end)
    } else {
        legacy::is_point_within(sm, loc, start, end)
    }
}
