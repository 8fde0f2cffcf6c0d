//! Source location encoding
//!
//! A `SourceLocation` is an opaque offset into the single address space shared by
//! every file and every macro expansion buffer of a translation unit. Only the
//! `SourceManager` can tell where a location points or how two locations are ordered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw encoding bit marking a location inside a macro expansion buffer
const MACRO_ID_BIT: u32 = 1 << 31;

/// An encoded location in the translation unit's address space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation(u32);

impl SourceLocation {
    /// The invalid location (raw encoding 0)
    pub const INVALID: SourceLocation = SourceLocation(0);

    /// Location at `offset` inside a file entry
    pub fn file(offset: u32) -> Self {
        debug_assert!(offset & MACRO_ID_BIT == 0, "offset overflows the address space");
        Self(offset & !MACRO_ID_BIT)
    }

    /// Location at `offset` inside a macro expansion entry
    pub fn macro_loc(offset: u32) -> Self {
        debug_assert!(offset & MACRO_ID_BIT == 0, "offset overflows the address space");
        Self(offset | MACRO_ID_BIT)
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub fn is_file_id(self) -> bool {
        self.0 & MACRO_ID_BIT == 0
    }

    pub fn is_macro_id(self) -> bool {
        self.0 & MACRO_ID_BIT != 0
    }

    /// Offset in the address space, without the macro bit
    pub fn offset(self) -> u32 {
        self.0 & !MACRO_ID_BIT
    }

    /// Same kind of location, moved by `delta` bytes
    pub fn with_offset(self, delta: u32) -> Self {
        Self(self.0 + delta)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            write!(f, "<invalid loc>")
        } else if self.is_macro_id() {
            write!(f, "<macro {}>", self.offset())
        } else {
            write!(f, "<file {}>", self.offset())
        }
    }
}

/// A (begin, end) pair of locations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(begin: SourceLocation, end: SourceLocation) -> Self {
        Self { begin, end }
    }

    /// Create a range covering a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            begin: location,
            end: location,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.begin.is_valid() && self.end.is_valid()
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// A range whose end is either the start of the last token or one past the last character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSourceRange {
    pub range: SourceRange,
    pub is_token_range: bool,
}

impl CharSourceRange {
    pub fn token_range(range: SourceRange) -> Self {
        Self {
            range,
            is_token_range: true,
        }
    }

    pub fn char_range(range: SourceRange) -> Self {
        Self {
            range,
            is_token_range: false,
        }
    }

    pub fn is_char_range(&self) -> bool {
        !self.is_token_range
    }

    pub fn begin(&self) -> SourceLocation {
        self.range.begin
    }

    pub fn end(&self) -> SourceLocation {
        self.range.end
    }
}

/// A location resolved to file, line and column (1-based) for display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresumedLoc {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl PresumedLoc {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }
}

impl fmt::Display for PresumedLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_location() {
        assert!(!SourceLocation::INVALID.is_valid());
        assert!(!SourceLocation::default().is_valid());
        assert_eq!(format!("{}", SourceLocation::INVALID), "<invalid loc>");
    }

    #[test]
    fn test_file_and_macro_encoding() {
        let file = SourceLocation::file(42);
        assert!(file.is_file_id());
        assert_eq!(file.offset(), 42);
        assert_eq!(file.raw(), 42);

        let mac = SourceLocation::macro_loc(42);
        assert!(mac.is_macro_id());
        assert_eq!(mac.offset(), 42);
        assert_ne!(file, mac);
        assert_eq!(SourceLocation::from_raw(mac.raw()), mac);
    }

    #[test]
    fn test_with_offset_keeps_kind() {
        let mac = SourceLocation::macro_loc(10).with_offset(5);
        assert!(mac.is_macro_id());
        assert_eq!(mac.offset(), 15);
    }

    #[test]
    fn test_char_source_range() {
        let range = SourceRange::new(SourceLocation::file(1), SourceLocation::file(4));
        assert!(!CharSourceRange::token_range(range).is_char_range());
        let chars = CharSourceRange::char_range(range);
        assert!(chars.is_char_range());
        assert_eq!(chars.begin(), SourceLocation::file(1));
        assert_eq!(chars.end(), SourceLocation::file(4));
    }

    #[test]
    fn test_presumed_loc_display() {
        let loc = PresumedLoc::new("test.cxx", 42, 10);
        assert_eq!(format!("{}", loc), "test.cxx:42:10");
    }
}
