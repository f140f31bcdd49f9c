// SPDX-License-Identifier: MPL-2.0

//! What one package requires of another.

use std::fmt::{self, Debug, Display};

use crate::constraint::Constraint;
use crate::source::Source;

/// An environment marker gating whether a dependency applies at all (e.g. an
/// OS or Python-version condition). The core never evaluates the expression
/// it carries; it is opaque payload threaded through for the provider to
/// interpret, the same way `Dependency.marker` is in the Python original.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Marker(Option<String>);

impl Marker {
    pub fn any() -> Self {
        Self(None)
    }

    pub fn new(expression: impl Into<String>) -> Self {
        Self(Some(expression.into()))
    }

    /// Whether this marker matches every environment.
    pub fn is_any(&self) -> bool {
        self.0.is_none()
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => write!(f, "*"),
            Some(expr) => write!(f, "{expr}"),
        }
    }
}

/// A requirement that one package places on another: a name, optional
/// extras, a source, a constraint, and an environment marker.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Dependency<C: Constraint> {
    pub name: String,
    /// Optional feature names requested alongside the base package.
    pub extras: Vec<String>,
    pub source: Source,
    pub constraint: C,
    pub marker: Marker,
    /// Set only for the synthetic dependency the solver uses to seed the
    /// root package; never true for a dependency produced by a provider.
    pub is_root: bool,
}

impl<C: Constraint> Dependency<C> {
    pub fn new(name: impl Into<String>, constraint: C, source: Source, marker: Marker) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            source,
            constraint,
            marker,
            is_root: false,
        }
    }

    pub fn with_extras(mut self, mut extras: Vec<String>) -> Self {
        extras.sort();
        extras.dedup();
        self.extras = extras;
        self
    }

    /// The synthetic dependency the solver uses to seed resolution: an exact
    /// pin on the root package's own version.
    pub(crate) fn root(name: impl Into<String>, constraint: C) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            source: Source::registry(),
            constraint,
            marker: Marker::any(),
            is_root: true,
        }
    }

    /// `name[extra1,extra2]`, the identity two dependencies must share to be
    /// considered requests for the exact same artifact.
    pub fn complete_name(&self) -> String {
        if self.extras.is_empty() {
            self.name.clone()
        } else {
            let mut extras = self.extras.clone();
            extras.sort();
            format!("{}[{}]", self.name, extras.join(","))
        }
    }

    /// Whether `other` names the same base package, ignoring extras — used
    /// to decide whether two differently-featured requests for one package
    /// may be treated as compatible alternatives rather than a conflict.
    pub fn is_same_package_as(&self, other: &Dependency<C>) -> bool {
        self.name == other.name && self.source == other.source
    }

    /// The key under which the partial solution and the incompatibility
    /// index group everything concerning this package: complete name plus
    /// source, matching the "about the same package" rule `Term` uses.
    pub(crate) fn package_key(&self) -> (String, Source) {
        (self.complete_name(), self.source.clone())
    }
}

impl<C: Constraint> Display for Dependency<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.complete_name(), self.constraint)
    }
}
