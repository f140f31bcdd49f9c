// SPDX-License-Identifier: MPL-2.0

//! Traits and implementations to create and compare versions.
//!
//! The core solver treats versions as opaque, totally ordered values; it
//! never parses a version string or assigns meaning to "major" or "patch".
//! The one piece of version semantics the solver does rely on is locked-
//! package matching: a locked prerelease is allowed to satisfy a constraint
//! written against the release it precedes, which is why [`Version`]
//! exposes [`is_prerelease`](Version::is_prerelease) and
//! [`next_patch`](Version::next_patch) rather than nothing at all.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Opaque, totally ordered version supplied by the ecosystem layer.
pub trait Version: Clone + Eq + Ord + Debug + Display + Hash {
    /// Whether this is a prerelease (alpha/beta/rc/dev, ...) version.
    fn is_prerelease(&self) -> bool;

    /// The smallest version strictly greater than `self` at the same
    /// major/minor line. Used only to let a locked prerelease satisfy a
    /// constraint that admits the release it precedes.
    fn next_patch(&self) -> Self;
}

/// Type for semantic versions: major.minor.patch[-preN].
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
    pre: Option<u32>,
}

impl SemanticVersion {
    /// Create a version with "major", "minor" and "patch" values.
    /// `version = major.minor.patch`
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Create a prerelease version, e.g. `1.2.3-pre.4`.
    pub fn prerelease(major: u32, minor: u32, patch: u32, pre: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Some(pre),
        }
    }

    /// Version 0.0.0.
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Version 1.0.0.
    pub fn one() -> Self {
        Self::new(1, 0, 0)
    }

    /// Bump the patch number of a version, dropping any prerelease tag.
    pub fn bump_patch(self) -> Self {
        Self::new(self.major, self.minor, self.patch + 1)
    }

    /// Bump the minor number of a version, dropping any prerelease tag.
    pub fn bump_minor(self) -> Self {
        Self::new(self.major, self.minor + 1, 0)
    }

    /// Bump the major number of a version, dropping any prerelease tag.
    pub fn bump_major(self) -> Self {
        Self::new(self.major + 1, 0, 0)
    }
}

// Convert a tuple (major, minor, patch) into a version.
impl From<(u32, u32, u32)> for SemanticVersion {
    fn from(tuple: (u32, u32, u32)) -> Self {
        let (major, minor, patch) = tuple;
        Self::new(major, minor, patch)
    }
}

impl Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = self.pre {
            write!(f, "-pre.{pre}")?;
        }
        Ok(())
    }
}

impl Version for SemanticVersion {
    fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    fn next_patch(&self) -> Self {
        Self::new(self.major, self.minor, self.patch + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerelease_next_patch_drops_pre_tag() {
        let v = SemanticVersion::prerelease(1, 2, 3, 1);
        assert!(v.is_prerelease());
        let next = v.next_patch();
        assert!(!next.is_prerelease());
        assert_eq!(next, SemanticVersion::new(1, 2, 4));
    }

    #[test]
    fn ordering_is_lexicographic_on_components() {
        assert!(SemanticVersion::new(1, 0, 0) < SemanticVersion::new(1, 0, 1));
        assert!(SemanticVersion::new(1, 0, 0) < SemanticVersion::new(1, 1, 0));
        assert!(SemanticVersion::new(1, 0, 0) < SemanticVersion::new(2, 0, 0));
    }
}
