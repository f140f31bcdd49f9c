// SPDX-License-Identifier: MPL-2.0

//! A minimal in-memory [`Provider`] for exercising [`VersionSolver`] end to
//! end, playing the role the teacher's `OfflineDependencyProvider` plays in
//! its own integration tests: every version and dependency is registered up
//! front, so a scenario reads as a small fixed universe of packages.

use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

use version_solver::{CompletePackage, Dependency, DependencyPackage, Marker, Provider, Range, SemanticVersion, Source};

pub type VS = Range<SemanticVersion>;

#[derive(Clone)]
struct PackageSpec {
    version: SemanticVersion,
    deps: Vec<Dependency<VS>>,
}

/// A fixed universe of packages and their dependencies, offline.
#[derive(Default)]
pub struct StubProvider {
    packages: HashMap<String, Vec<PackageSpec>>,
    /// Names `search_for` reports as unreachable, for provider-error scenarios.
    unreachable: HashSet<String>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one candidate version of `name`, with the given dependencies.
    pub fn add(&mut self, name: &str, version: (u32, u32, u32), deps: Vec<Dependency<VS>>) -> &mut Self {
        self.packages.entry(name.to_string()).or_default().push(PackageSpec {
            version: SemanticVersion::new(version.0, version.1, version.2),
            deps,
        });
        self
    }

    /// Makes `search_for` fail for `name`, as if a registry lookup errored.
    pub fn fail_lookup(&mut self, name: &str) -> &mut Self {
        self.unreachable.insert(name.to_string());
        self
    }
}

impl Provider for StubProvider {
    type C = VS;
    type M = String;
    type Err = Infallible;

    fn search_for(&self, dependency: &Dependency<VS>) -> Result<Vec<DependencyPackage<VS>>, String> {
        if self.unreachable.contains(&dependency.name) {
            return Err(format!("lookup failed for {}", dependency.name));
        }
        let mut candidates: Vec<DependencyPackage<VS>> = self
            .packages
            .get(&dependency.name)
            .into_iter()
            .flatten()
            .map(|spec| DependencyPackage::new(dependency.clone(), spec.version))
            .collect();
        candidates.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(candidates)
    }

    fn complete_package(&self, package: &DependencyPackage<VS>) -> Result<CompletePackage<VS>, Infallible> {
        let deps = self
            .packages
            .get(&package.dependency.name)
            .into_iter()
            .flatten()
            .find(|spec| spec.version == package.version)
            .map(|spec| spec.deps.clone())
            .unwrap_or_default();
        Ok(CompletePackage::new(package.clone(), deps))
    }
}

pub fn dep(name: &str, range: VS) -> Dependency<VS> {
    Dependency::new(name, range, Source::registry(), Marker::any())
}

pub fn dep_extra(name: &str, extra: &str, range: VS) -> Dependency<VS> {
    dep(name, range).with_extras(vec![extra.to_string()])
}

pub fn locked(name: &str, version: (u32, u32, u32)) -> DependencyPackage<VS> {
    DependencyPackage::new(dep(name, Range::full()), SemanticVersion::new(version.0, version.1, version.2))
}

pub fn caret(major: u32) -> VS {
    Range::between(SemanticVersion::new(major, 0, 0), SemanticVersion::new(major + 1, 0, 0))
}

pub fn exact(major: u32, minor: u32, patch: u32) -> VS {
    Range::singleton(SemanticVersion::new(major, minor, patch))
}
