// SPDX-License-Identifier: MPL-2.0

//! An assignment is one entry in the partial solution's append-only log: a
//! decision the solver made, or a fact derived from an incompatibility.

use crate::constraint::Constraint;
use crate::dependency::Dependency;
use crate::internal::arena::Id;
use crate::internal::incompatibility::Incompatibility;
use crate::term::Term;

/// One entry in the partial solution's chronological log.
#[derive(Debug, Clone)]
pub struct Assignment<C: Constraint, M> {
    pub dependency: Dependency<C>,
    pub is_positive: bool,
    /// Nesting depth of the decision this assignment was made or derived
    /// under; decisions increment it, derivations inherit it.
    pub decision_level: u32,
    /// Position of this assignment in the global log.
    pub index: u32,
    /// `None` for a decision, `Some` for a fact derived by unit propagation.
    pub cause: Option<Id<Incompatibility<C, M>>>,
    /// The exact version pinned by a decision; `None` for a derivation.
    pub decided_version: Option<C::V>,
}

impl<C: Constraint, M> Assignment<C, M> {
    pub fn decision(dependency: Dependency<C>, version: C::V, decision_level: u32, index: u32) -> Self {
        Self {
            dependency,
            is_positive: true,
            decision_level,
            index,
            cause: None,
            decided_version: Some(version),
        }
    }

    pub fn derivation(
        dependency: Dependency<C>,
        is_positive: bool,
        decision_level: u32,
        index: u32,
        cause: Id<Incompatibility<C, M>>,
    ) -> Self {
        Self {
            dependency,
            is_positive,
            decision_level,
            index,
            cause: Some(cause),
            decided_version: None,
        }
    }

    pub fn is_decision(&self) -> bool {
        self.cause.is_none()
    }

    pub fn as_term(&self) -> Term<C> {
        Term::new(self.dependency.clone(), self.is_positive)
    }
}
