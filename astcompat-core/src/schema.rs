//! Host schema versions
//!
//! The layer is compiled against exactly one host schema. Cargo features pin an
//! older one; without any, the newest supported schema is active. Adapters
//! compare `ACTIVE` against the revision that changed the accessor they wrap.

use std::fmt;

/// Ordered schema identifier: `major * 10000 + minor * 100 + patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        SchemaVersion(major * 10000 + minor * 100 + patch)
    }

    pub const fn from_raw(raw: u32) -> Self {
        SchemaVersion(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn major(self) -> u32 {
        self.0 / 10000
    }

    pub const fn minor(self) -> u32 {
        self.0 / 100 % 100
    }

    pub const fn patch(self) -> u32 {
        self.0 % 100
    }

    /// Whether this schema includes the revision `threshold`
    pub const fn at_least(self, threshold: SchemaVersion) -> bool {
        self.0 >= threshold.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

pub const V5: SchemaVersion = SchemaVersion::new(5, 0, 0);
pub const V6: SchemaVersion = SchemaVersion::new(6, 0, 0);
pub const V7: SchemaVersion = SchemaVersion::new(7, 0, 0);
pub const V8: SchemaVersion = SchemaVersion::new(8, 0, 0);
pub const V9: SchemaVersion = SchemaVersion::new(9, 0, 0);

/// Newest schema this layer knows about
pub const LATEST: SchemaVersion = V9;

/// The schema the layer is built against
pub const ACTIVE: SchemaVersion = if cfg!(feature = "schema-5") {
    V5
} else if cfg!(feature = "schema-6") {
    V6
} else if cfg!(feature = "schema-7") {
    V7
} else if cfg!(feature = "schema-8") {
    V8
} else {
    LATEST
};

/// Revisions at which host accessors changed shape
pub mod revisions {
    use super::{SchemaVersion, V6, V7, V8, V9};

    /// `begin_loc`/`end_loc` replace `loc_start`/`loc_end`
    pub const BEGIN_END_LOC: SchemaVersion = V8;
    /// `ignore_implicit` becomes a host accessor
    pub const IGNORE_IMPLICIT: SchemaVersion = V8;
    /// Integer evaluation reports a generic result
    pub const EVAL_RESULT: SchemaVersion = V8;
    /// Expansion ranges carry their token/character flavor
    pub const CHAR_EXPANSION_RANGE: SchemaVersion = V7;
    /// The source manager answers containment itself
    pub const POINT_WITHIN: SchemaVersion = V6;
    /// The C++17 flag loses its provisional name
    pub const CPLUSPLUS17: SchemaVersion = V6;
    /// Conditional `explicit` specifiers
    pub const EXPLICIT_SPECIFIER: SchemaVersion = V9;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parts() {
        let version = SchemaVersion::new(7, 1, 2);
        assert_eq!(version.raw(), 70102);
        assert_eq!((version.major(), version.minor(), version.patch()), (7, 1, 2));
        assert_eq!(version.to_string(), "7.1.2");
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(V5 < V6 && V6 < V7 && V7 < V8 && V8 < V9);
        assert!(V8.at_least(revisions::BEGIN_END_LOC));
        assert!(!V7.at_least(revisions::BEGIN_END_LOC));
        assert!(SchemaVersion::new(8, 0, 1).at_least(V8));
    }

    #[test]
    fn test_active_is_supported() {
        assert!(ACTIVE >= V5 && ACTIVE <= LATEST);
        if !cfg!(any(
            feature = "schema-5",
            feature = "schema-6",
            feature = "schema-7",
            feature = "schema-8"
        )) {
            assert_eq!(ACTIVE, LATEST);
        }
    }
}
