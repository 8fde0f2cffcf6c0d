//! Source manager: the address space behind `SourceLocation`
//!
//! Files and macro expansion buffers are allocated consecutive ranges of one
//! offset space, exactly like the front end that produced the AST. The manager
//! answers where a location points, which macro expansion produced it, and how two
//! locations are ordered within the translation unit.

use crate::error::CompatError;
use crate::source_loc::{CharSourceRange, PresumedLoc, SourceLocation, SourceRange};
use log::trace;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Index of an entry in the source manager's entry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// A source file (or header) loaded into the translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u32,
    /// Offsets (within the file) at which each line starts; the first is always 0
    pub line_starts: Vec<u32>,
    /// Location of the `#include` that pulled this file in; invalid for the main file
    pub include_loc: SourceLocation,
}

/// A macro expansion buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionInfo {
    /// Where the expanded tokens were spelled
    pub spelling_loc: SourceLocation,
    pub expansion_start: SourceLocation,
    pub expansion_end: SourceLocation,
    /// Whether `expansion_end` points at the start of the last token (token range)
    /// or one past its last character (character range)
    pub is_token_range: bool,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SLocEntryKind {
    File(FileInfo),
    Expansion(ExpansionInfo),
}

/// One allocated range of the address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SLocEntry {
    pub offset: u32,
    pub kind: SLocEntryKind,
}

/// Key realising the translation-unit order of locations.
///
/// `path` holds the root file's entry index followed by the offsets of each
/// `#include` on the way down and finally the offset inside the innermost file;
/// `raw` breaks ties between distinct locations that expand to the same point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TuOrderKey {
    path: Vec<u32>,
    raw: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceManager {
    entries: Vec<SLocEntry>,
    next_offset: u32,
    main_file: Option<FileId>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            // offset 0 is reserved for the invalid location
            next_offset: 1,
            main_file: None,
        }
    }

    /// Load a file into the address space.
    ///
    /// The first file added without an include location becomes the main file.
    pub fn add_file(&mut self, name: &str, contents: &str, include_loc: SourceLocation) -> FileId {
        let size = contents.len() as u32;
        let mut line_starts = vec![0];
        line_starts.extend(
            contents
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );

        let id = FileId(self.entries.len() as u32);
        self.entries.push(SLocEntry {
            offset: self.next_offset,
            kind: SLocEntryKind::File(FileInfo {
                name: name.to_string(),
                size,
                line_starts,
                include_loc,
            }),
        });
        // one extra slot so the end-of-file location is addressable
        self.next_offset += size + 1;

        if self.main_file.is_none() && !include_loc.is_valid() {
            self.main_file = Some(id);
        }
        trace!("added file '{name}' as {id:?} ({size} bytes)");
        id
    }

    /// Allocate a macro expansion buffer and return the location of its first byte
    pub fn add_expansion(
        &mut self,
        spelling_loc: SourceLocation,
        expansion_range: SourceRange,
        length: u32,
        is_token_range: bool,
    ) -> SourceLocation {
        let offset = self.next_offset;
        self.entries.push(SLocEntry {
            offset,
            kind: SLocEntryKind::Expansion(ExpansionInfo {
                spelling_loc,
                expansion_start: expansion_range.begin,
                expansion_end: expansion_range.end,
                is_token_range,
                length,
            }),
        });
        self.next_offset += length + 1;
        SourceLocation::macro_loc(offset)
    }

    pub fn main_file_id(&self) -> Option<FileId> {
        self.main_file
    }

    pub fn entries(&self) -> &[SLocEntry] {
        &self.entries
    }

    pub fn file_info(&self, file: FileId) -> Option<&FileInfo> {
        match self.entries.get(file.0 as usize).map(|e| &e.kind) {
            Some(SLocEntryKind::File(info)) => Some(info),
            _ => None,
        }
    }

    /// Location of byte `offset` in `file`, or the invalid location if out of range
    pub fn location(&self, file: FileId, offset: u32) -> SourceLocation {
        match self.entries.get(file.0 as usize) {
            Some(SLocEntry {
                offset: start,
                kind: SLocEntryKind::File(info),
            }) if offset <= info.size => SourceLocation::file(start + offset),
            _ => SourceLocation::INVALID,
        }
    }

    /// Find the entry that owns `loc`, checking that its kind matches the encoding
    fn lookup(&self, loc: SourceLocation) -> Option<(usize, &SLocEntry)> {
        if !loc.is_valid() {
            return None;
        }
        let offset = loc.offset();
        let index = self
            .entries
            .partition_point(|e| e.offset <= offset)
            .checked_sub(1)?;
        let entry = &self.entries[index];
        let delta = offset - entry.offset;
        let owned = match &entry.kind {
            SLocEntryKind::File(info) => loc.is_file_id() && delta <= info.size,
            SLocEntryKind::Expansion(info) => loc.is_macro_id() && delta <= info.length,
        };
        owned.then_some((index, entry))
    }

    pub fn expansion_info(&self, loc: SourceLocation) -> Option<&ExpansionInfo> {
        match self.lookup(loc)?.1 {
            SLocEntry {
                kind: SLocEntryKind::Expansion(info),
                ..
            } => Some(info),
            _ => None,
        }
    }

    /// File and offset-in-file of a file location
    pub fn decompose_file_loc(&self, loc: SourceLocation) -> Option<(FileId, u32)> {
        let (index, entry) = self.lookup(loc)?;
        match entry.kind {
            SLocEntryKind::File(_) => Some((FileId(index as u32), loc.offset() - entry.offset)),
            SLocEntryKind::Expansion(_) => None,
        }
    }

    /// Follow macro expansions outwards to the file location where `loc` was expanded
    pub fn expansion_loc(&self, loc: SourceLocation) -> SourceLocation {
        let mut current = loc;
        // well-formed chains never revisit an entry, so the entry count bounds the walk
        for _ in 0..=self.entries.len() {
            if !current.is_macro_id() {
                return current;
            }
            match self.expansion_info(current) {
                Some(info) => current = info.expansion_start,
                None => return SourceLocation::INVALID,
            }
        }
        SourceLocation::INVALID
    }

    /// Follow macro expansions inwards to where the token was spelled
    pub fn spelling_loc(&self, loc: SourceLocation) -> SourceLocation {
        let mut current = loc;
        for _ in 0..=self.entries.len() {
            if !current.is_macro_id() {
                return current;
            }
            let Some((_, entry)) = self.lookup(current) else {
                return SourceLocation::INVALID;
            };
            match &entry.kind {
                SLocEntryKind::Expansion(info) => {
                    current = info.spelling_loc.with_offset(current.offset() - entry.offset);
                }
                SLocEntryKind::File(_) => return SourceLocation::INVALID,
            }
        }
        SourceLocation::INVALID
    }

    /// Bounds of the macro expansion that immediately produced `loc`.
    ///
    /// File locations are their own expansion: the range is `(loc, loc)`.
    pub fn immediate_expansion_range(&self, loc: SourceLocation) -> CharSourceRange {
        match self.expansion_info(loc) {
            Some(info) => CharSourceRange {
                range: SourceRange::new(info.expansion_start, info.expansion_end),
                is_token_range: info.is_token_range,
            },
            None => CharSourceRange::token_range(SourceRange::from_location(loc)),
        }
    }

    fn tu_order_key(&self, loc: SourceLocation) -> TuOrderKey {
        let mut offsets = Vec::new();
        let mut root = None;
        let mut current = self.expansion_loc(loc);
        for _ in 0..=self.entries.len() {
            let Some((file, offset)) = self.decompose_file_loc(current) else {
                break;
            };
            offsets.push(offset);
            let include_loc = self
                .file_info(file)
                .map(|info| info.include_loc)
                .unwrap_or_default();
            if !include_loc.is_valid() {
                root = Some(file.0);
                break;
            }
            current = self.expansion_loc(include_loc);
        }

        let path = match root {
            Some(root) => std::iter::once(root).chain(offsets.into_iter().rev()).collect(),
            None => Vec::new(),
        };
        TuOrderKey {
            path,
            raw: loc.raw(),
        }
    }

    /// Order two locations as they appear in the translation unit
    pub fn compare_in_translation_unit(&self, a: SourceLocation, b: SourceLocation) -> Ordering {
        self.tu_order_key(a).cmp(&self.tu_order_key(b))
    }

    pub fn is_before_in_translation_unit(&self, a: SourceLocation, b: SourceLocation) -> bool {
        self.compare_in_translation_unit(a, b) == Ordering::Less
    }

    /// Whether `loc` lies in `[start, end]`; both ends are inclusive
    pub fn is_point_within(
        &self,
        loc: SourceLocation,
        start: SourceLocation,
        end: SourceLocation,
    ) -> bool {
        if loc == start || loc == end {
            return true;
        }
        let key = self.tu_order_key(loc);
        self.tu_order_key(start) < key && key < self.tu_order_key(end)
    }

    /// Resolve to file name, line and column of the expansion location
    pub fn presumed_loc(&self, loc: SourceLocation) -> Option<PresumedLoc> {
        let (file, offset) = self.decompose_file_loc(self.expansion_loc(loc))?;
        let info = self.file_info(file)?;
        let line_index = info
            .line_starts
            .partition_point(|start| *start <= offset)
            .checked_sub(1)?;
        let column = offset - info.line_starts[line_index] + 1;
        Some(PresumedLoc::new(&info.name, line_index as u32 + 1, column))
    }

    /// Check the invariants a deserialized manager must satisfy
    pub fn validate(&self) -> Result<(), CompatError> {
        let mut expected_start = 1;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.offset < expected_start {
                return Err(CompatError::MalformedSourceManager {
                    message: format!("entry {index} overlaps the previous entry"),
                });
            }
            let length = match &entry.kind {
                SLocEntryKind::File(info) => {
                    if info.line_starts.first() != Some(&0) {
                        return Err(CompatError::MalformedSourceManager {
                            message: format!("file '{}' has no first line", info.name),
                        });
                    }
                    info.size
                }
                SLocEntryKind::Expansion(info) => info.length,
            };
            expected_start = entry.offset + length + 1;
        }
        if expected_start > self.next_offset {
            return Err(CompatError::MalformedSourceManager {
                message: "entries extend past the allocated address space".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}
