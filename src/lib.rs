// SPDX-License-Identifier: MPL-2.0

//! A conflict-driven clause-learning dependency version solver.
//!
//! Finds a consistent set of package versions satisfying every dependency
//! constraint reachable from a root project, or a structured explanation of
//! why none exists, without caring what ecosystem (crates, PyPI, npm, ...)
//! the caller's packages actually come from.
//!
//! # Package and version traits
//!
//! The solver core never parses a version string or hits a registry itself.
//! It is generic over two things supplied by the caller:
//!
//! - [`Version`]: an opaque, totally ordered version value. [`SemanticVersion`]
//!   is provided for the common major.minor.patch case.
//! - [`Constraint`]: an opaque version set closed under intersection and
//!   complement. [`Range`] is provided for the common case of a version set
//!   described by a finite union of half-open intervals.
//!
//! # Basic example
//!
//! ```
//! use version_solver::{
//!     CompletePackage, Dependency, DependencyPackage, Marker, Provider,
//!     ProjectPackage, Range, SemanticVersion, Source, VersionSolver,
//! };
//! use std::convert::Infallible;
//!
//! type VS = Range<SemanticVersion>;
//!
//! struct Offline(Vec<(&'static str, SemanticVersion, Vec<(&'static str, VS)>)>);
//!
//! impl Provider for Offline {
//!     type C = VS;
//!     type M = String;
//!     type Err = Infallible;
//!
//!     fn search_for(&self, dependency: &Dependency<VS>) -> Result<Vec<DependencyPackage<VS>>, String> {
//!         Ok(self
//!             .0
//!             .iter()
//!             .filter(|(name, _, _)| *name == dependency.name)
//!             .map(|(_, v, _)| DependencyPackage::new(dependency.clone(), *v))
//!             .collect())
//!     }
//!
//!     fn complete_package(&self, package: &DependencyPackage<VS>) -> Result<CompletePackage<VS>, Infallible> {
//!         let deps = self
//!             .0
//!             .iter()
//!             .find(|(name, v, _)| *name == package.dependency.name && *v == package.version)
//!             .map(|(_, _, deps)| {
//!                 deps.iter()
//!                     .map(|(name, range)| Dependency::new(*name, range.clone(), Source::registry(), Marker::any()))
//!                     .collect()
//!             })
//!             .unwrap_or_default();
//!         Ok(CompletePackage::new(package.clone(), deps))
//!     }
//! }
//!
//! let provider = Offline(vec![
//!     ("root", SemanticVersion::new(1, 0, 0), vec![("menu", Range::full())]),
//!     ("menu", SemanticVersion::new(1, 0, 0), vec![]),
//! ]);
//! let root = ProjectPackage::new("root", SemanticVersion::new(1, 0, 0));
//! let solution = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve().unwrap();
//! assert_eq!(solution.packages.len(), 1);
//! ```

mod assignment;
mod cache;
mod constraint;
mod dependency;
mod error;
mod internal;
mod package;
mod provider;
mod range;
mod result;
mod solver;
mod source;
mod term;
mod version;

pub use constraint::{Constraint, SetRelation};
pub use dependency::{Dependency, Marker};
pub use error::{ResolveError, SolveFailure};
pub use package::{CompletePackage, DependencyPackage, ProjectPackage};
pub use provider::Provider;
pub use range::Range;
pub use result::SolverResult;
pub use solver::VersionSolver;
pub use source::{Source, SourceKind};
pub use term::Term;
pub use version::{SemanticVersion, Version};
