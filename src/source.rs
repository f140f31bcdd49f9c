// SPDX-License-Identifier: MPL-2.0

//! Where a dependency's candidate versions come from.
//!
//! A registry source can offer many versions of the same package; a pinned
//! source (git, direct URL, local path/directory) offers exactly one, which
//! matters to [`VersionSolver`](crate::solver::VersionSolver) when it decides
//! whether exploring alternatives for a package is even possible.

use std::fmt::{self, Display};

/// The kind of origin a [`Dependency`](crate::dependency::Dependency) is
/// resolved against.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// An index of many published versions.
    Registry,
    /// A git repository, pinned to a revision or branch.
    Git,
    /// A local filesystem path.
    Path,
    /// A direct URL to an archive.
    Url,
    /// A local directory built in place rather than unpacked from an archive.
    Directory,
}

/// Origin of a dependency's candidate versions.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Source {
    pub kind: SourceKind,
    /// Git/URL/path location, absent for a plain registry source.
    pub url: Option<String>,
    /// Git revision, branch, or tag, absent outside `SourceKind::Git`.
    pub reference: Option<String>,
}

impl Source {
    /// The default registry source.
    pub fn registry() -> Self {
        Self {
            kind: SourceKind::Registry,
            url: None,
            reference: None,
        }
    }

    pub fn git(url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Git,
            url: Some(url.into()),
            reference: Some(reference.into()),
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Path,
            url: Some(path.into()),
            reference: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Url,
            url: Some(url.into()),
            reference: None,
        }
    }

    /// Whether this source can only ever resolve to a single version, so a
    /// solver never has a real choice of candidates to explore.
    pub fn is_pinned(&self) -> bool {
        !matches!(self.kind, SourceKind::Registry)
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SourceKind::Registry => write!(f, "registry"),
            SourceKind::Git => write!(
                f,
                "git+{}@{}",
                self.url.as_deref().unwrap_or(""),
                self.reference.as_deref().unwrap_or("")
            ),
            SourceKind::Path => write!(f, "path+{}", self.url.as_deref().unwrap_or("")),
            SourceKind::Url => write!(f, "url+{}", self.url.as_deref().unwrap_or("")),
            SourceKind::Directory => write!(f, "directory+{}", self.url.as_deref().unwrap_or("")),
        }
    }
}
