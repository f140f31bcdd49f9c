// SPDX-License-Identifier: MPL-2.0

//! The interface the solver core calls into to learn what exists.
//!
//! Plays the role the teacher's `DependencyProvider` trait in `src/solver.rs`
//! plays, generalized to the richer package/dependency shapes this crate's
//! domain needs (extras, sources, markers, locked preferences).

use std::fmt::{Debug, Display};

use crate::constraint::Constraint;
use crate::dependency::Dependency;
use crate::internal::incompatibility::Incompatibility;
use crate::package::{CompletePackage, DependencyPackage};

/// Supplies package metadata to a [`VersionSolver`](crate::solver::VersionSolver).
///
/// The core never parses a manifest or talks to a registry itself; every
/// fact about what packages and versions exist comes through this trait.
pub trait Provider {
    /// The constraint algebra this provider's ecosystem uses.
    type C: Constraint;
    /// Payload carried by a "could not even look up this dependency" cause,
    /// e.g. an HTTP status or a parse error rendered to a string.
    type M: Clone + Eq + Debug + Display;
    /// Fatal, non-recoverable transport/IO error type, propagated untouched
    /// out of [`VersionSolver::solve`](crate::solver::VersionSolver::solve).
    type Err: std::error::Error + 'static;

    /// Every known candidate for `dependency`, regardless of whether it
    /// currently satisfies the constraint (the solver's [`cache`](crate::cache)
    /// layer does the filtering). A `search_for` failure is recoverable: the
    /// solver turns it into a `PackageNotFoundCause` incompatibility rather
    /// than aborting the whole solve.
    fn search_for(&self, dependency: &Dependency<Self::C>) -> Result<Vec<DependencyPackage<Self::C>>, Self::M>;

    /// Expands a chosen candidate into its own dependencies.
    fn complete_package(&self, package: &DependencyPackage<Self::C>) -> Result<CompletePackage<Self::C>, Self::Err>;

    /// Any additional incompatibilities a provider wants to contribute for
    /// `package` beyond the ones the solver derives from its dependencies
    /// (e.g. platform/marker exclusions). Most providers return an empty
    /// list.
    fn incompatibilities_for(
        &self,
        package: &CompletePackage<Self::C>,
    ) -> Result<Vec<Incompatibility<Self::C, Self::M>>, Self::Err> {
        let _ = package;
        Ok(Vec::new())
    }

    /// Solver-invoked tracing hook, called at every fact/derivation/conflict/
    /// decision point (spec.md §6, cadence pinned in SPEC_FULL.md §B.1/§C.1).
    /// Forwards to the `log` crate by default; override for an
    /// ecosystem-specific structured logger.
    fn debug(&self, text: &str, attempted_solutions: u32) {
        log::debug!("{text} (attempt {attempted_solutions})");
    }
}
