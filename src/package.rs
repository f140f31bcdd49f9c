// SPDX-License-Identifier: MPL-2.0

//! The three package shapes the solver passes around: a bare requirement
//! paired with a candidate version, the project being resolved for, and a
//! candidate fully expanded with its own dependencies.

use crate::constraint::Constraint;
use crate::dependency::Dependency;

/// A dependency paired with one candidate version a provider offered for it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DependencyPackage<C: Constraint> {
    pub dependency: Dependency<C>,
    pub version: C::V,
}

impl<C: Constraint> DependencyPackage<C> {
    pub fn new(dependency: Dependency<C>, version: C::V) -> Self {
        Self { dependency, version }
    }

    pub fn complete_name(&self) -> String {
        self.dependency.complete_name()
    }

    pub fn is_root(&self) -> bool {
        self.dependency.is_root
    }
}

/// The package being resolved for: a name and the exact version already
/// chosen for it, from which the solver derives its root dependency.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ProjectPackage<C: Constraint> {
    pub name: String,
    pub version: C::V,
}

impl<C: Constraint> ProjectPackage<C> {
    pub fn new(name: impl Into<String>, version: C::V) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// The dependency the solver seeds resolution with: a pin on this
    /// project's own version.
    pub(crate) fn root_dependency(&self) -> Dependency<C> {
        Dependency::root(self.name.clone(), C::singleton(self.version.clone()))
    }
}

/// A candidate fully expanded with the dependencies it would bring in if
/// selected.
#[derive(Debug, Clone)]
pub struct CompletePackage<C: Constraint> {
    pub package: DependencyPackage<C>,
    pub dependencies: Vec<Dependency<C>>,
}

impl<C: Constraint> CompletePackage<C> {
    pub fn new(package: DependencyPackage<C>, dependencies: Vec<Dependency<C>>) -> Self {
        Self { package, dependencies }
    }
}
