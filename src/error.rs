// SPDX-License-Identifier: MPL-2.0

//! Errors a solve can end with.
//!
//! Mirrors the teacher's `PubGrubError<DP>` shape (a `thiserror::Error` enum
//! parameterized by the provider trait) but splits the "no solution" case
//! out into [`SolveFailure`], which is deliberately not a `thiserror`
//! variant carrying a rendered string: spec.md puts report rendering out of
//! scope, so the failure exposes the structured terminal incompatibility and
//! its supporting arena for a caller-supplied reporter to walk instead.

use std::fmt;

use crate::internal::arena::{Arena, Id};
use crate::internal::incompatibility::Incompatibility;
use crate::provider::Provider;

/// The solver proved no version assignment exists.
pub struct SolveFailure<PR: Provider> {
    /// The contradiction conflict resolution reduced the problem to.
    pub terminal: Id<Incompatibility<PR::C, PR::M>>,
    /// Every incompatibility derived during the solve, needed to walk the
    /// terminal incompatibility's cause DAG back to its root causes.
    pub store: Arena<Incompatibility<PR::C, PR::M>>,
    pub attempted_solutions: u32,
}

impl<PR: Provider> fmt::Debug for SolveFailure<PR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveFailure")
            .field("terminal", &self.terminal)
            .field("attempted_solutions", &self.attempted_solutions)
            .finish()
    }
}

impl<PR: Provider> fmt::Display for SolveFailure<PR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no solution")
    }
}

impl<PR: Provider> std::error::Error for SolveFailure<PR> {}

/// Top-level error a solve can fail with.
pub enum ResolveError<PR: Provider> {
    /// The constraints are unsatisfiable; see the wrapped failure for the
    /// structured cause.
    NoSolution(SolveFailure<PR>),

    /// The provider itself failed in a way that isn't recoverable by
    /// recording an incompatibility (a registry timed out, a file couldn't
    /// be read, ...), propagated untouched.
    Provider(PR::Err),
}

impl<PR: Provider> fmt::Debug for ResolveError<PR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSolution(failure) => f.debug_tuple("NoSolution").field(failure).finish(),
            Self::Provider(err) => f.debug_tuple("Provider").field(err).finish(),
        }
    }
}

impl<PR: Provider> fmt::Display for ResolveError<PR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSolution(_) => write!(f, "no solution"),
            Self::Provider(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<PR: Provider + 'static> std::error::Error for ResolveError<PR> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoSolution(failure) => Some(failure),
            Self::Provider(err) => Some(err),
        }
    }
}
