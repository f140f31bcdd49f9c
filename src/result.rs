// SPDX-License-Identifier: MPL-2.0

//! The output of a successful solve.

use crate::constraint::Constraint;
use crate::package::{DependencyPackage, ProjectPackage};

/// A complete, consistent set of package versions.
#[derive(Debug, Clone)]
pub struct SolverResult<C: Constraint> {
    pub root: ProjectPackage<C>,
    pub packages: Vec<DependencyPackage<C>>,
    /// Total decisions committed to, including ones later backtracked —
    /// exposed for logging/diagnostics only.
    pub attempted_solutions: u32,
}
