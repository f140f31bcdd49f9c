// SPDX-License-Identifier: MPL-2.0

//! The partial solution: the chronological log of every decision and
//! derivation the solver has made so far, plus the per-package bookkeeping
//! needed to query it efficiently.
//!
//! Grounded on the teacher's `internal/partial_solution.rs` technique (a
//! cached per-package summary term avoids re-deriving relations from
//! scratch) adapted to the flatter, literal `Assignment` log spec.md
//! describes, rather than the teacher's more aggressively optimized
//! `PackageAssignments`/`DatedDerivation` split.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::assignment::Assignment;
use crate::constraint::{Constraint, SetRelation};
use crate::dependency::Dependency;
use crate::internal::arena::Id;
use crate::internal::incompatibility::Incompatibility;
use crate::package::DependencyPackage;
use crate::source::Source;
use crate::term::Term;

type PackageKey = (String, Source);
type Map<K, V> = IndexMap<K, V, FxBuildHasher>;

struct PackageEntry<C: Constraint> {
    /// Running intersection of every term seen so far about this package;
    /// `None` until the first assignment arrives (equivalent to "any").
    summary: Option<Term<C>>,
    decision: Option<C::V>,
    /// Indices into the global log, in the order they were appended.
    log_indices: Vec<usize>,
}

impl<C: Constraint> PackageEntry<C> {
    fn new() -> Self {
        Self {
            summary: None,
            decision: None,
            log_indices: Vec::new(),
        }
    }

    fn record(&mut self, term: &Term<C>, index: usize) {
        self.summary = Some(match &self.summary {
            Some(existing) => existing.intersect(term),
            None => term.clone(),
        });
        self.log_indices.push(index);
    }
}

/// The solver's evolving partial solution.
pub(crate) struct PartialSolution<C: Constraint, M> {
    assignments: Vec<Assignment<C, M>>,
    decision_level: u32,
    by_package: Map<PackageKey, PackageEntry<C>>,
    /// How many decisions the solver has committed to overall, including
    /// ones later undone by backtracking — exposed to providers purely for
    /// logging, per spec.md §5.
    attempted_solutions: u32,
}

impl<C: Constraint, M> PartialSolution<C, M> {
    pub fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            decision_level: 0,
            by_package: Map::default(),
            attempted_solutions: 1,
        }
    }

    pub fn current_decision_level(&self) -> u32 {
        self.decision_level
    }

    pub fn attempted_solutions(&self) -> u32 {
        self.attempted_solutions
    }

    fn entry(&mut self, key: &PackageKey) -> &mut PackageEntry<C> {
        self.by_package.entry(key.clone()).or_insert_with(PackageEntry::new)
    }

    /// Records a decision: a new, deeper decision level begins.
    pub fn decide(&mut self, package: &DependencyPackage<C>) {
        self.decision_level += 1;
        let dependency = Dependency {
            constraint: C::singleton(package.version.clone()),
            ..package.dependency.clone()
        };
        let index = self.assignments.len();
        let assignment = Assignment::decision(dependency, package.version.clone(), self.decision_level, index as u32);
        let term = assignment.as_term();
        let key = assignment.dependency.package_key();
        self.entry(&key).record(&term, index);
        self.entry(&key).decision = Some(package.version.clone());
        self.assignments.push(assignment);
    }

    /// Records a fact derived from unit-propagating `cause`.
    pub fn derive(&mut self, dependency: Dependency<C>, is_positive: bool, cause: Id<Incompatibility<C, M>>) {
        let index = self.assignments.len();
        let assignment = Assignment::derivation(dependency, is_positive, self.decision_level, index as u32, cause);
        let term = assignment.as_term();
        self.entry(&assignment.dependency.package_key()).record(&term, index);
        self.assignments.push(assignment);
    }

    /// Relation of `term` to this package's current summary: `SUBSET` if the
    /// solution already implies `term`, `DISJOINT` if it already rules it
    /// out, `OVERLAPPING` otherwise (including when nothing is known yet).
    pub fn relation(&self, term: &Term<C>) -> SetRelation {
        match self.by_package.get(&term.dependency.package_key()) {
            None => SetRelation::Overlapping,
            Some(entry) => match &entry.summary {
                None => SetRelation::Overlapping,
                Some(summary) => summary.relation(term),
            },
        }
    }

    /// The running summary term for `complete_name`/`source`, if anything is
    /// known about it yet.
    pub fn term_for(&self, key: &(String, Source)) -> Option<&Term<C>> {
        self.by_package.get(key).and_then(|e| e.summary.as_ref())
    }

    pub fn decision_for(&self, key: &(String, Source)) -> Option<&C::V> {
        self.by_package.get(key).and_then(|e| e.decision.as_ref())
    }

    /// Dependencies with a positive derivation but no decision yet, in the
    /// order their package was first touched. The root package is never
    /// included: it is resolved by derivation alone (see
    /// `Incompatibility::not_root`) and has no candidates to search for.
    pub fn unsatisfied(&self) -> Vec<Dependency<C>> {
        self.by_package
            .iter()
            .filter(|(_, e)| e.decision.is_none())
            .filter_map(|(_, e)| {
                let summary = e.summary.as_ref()?;
                (summary.is_positive() && !summary.dependency.is_root).then(|| summary.dependency.clone())
            })
            .collect()
    }

    /// The earliest assignment whose accumulated intersection already
    /// implies `term` — the assignment that made `term`'s incompatibility
    /// possible to derive — paired with the residual term it asserts beyond
    /// what `term` strictly needed, if any (`None` when the assignment's own
    /// term is already a subset of `term`, i.e. it contributed nothing more
    /// than required).
    pub fn satisfier(&self, term: &Term<C>) -> (&Assignment<C, M>, Option<Term<C>>) {
        let key = term.dependency.package_key();
        let entry = self.by_package.get(&key).expect("satisfier queried for an untouched package");
        let mut acc: Option<Term<C>> = None;
        for &idx in &entry.log_indices {
            let assignment = &self.assignments[idx];
            let own_term = assignment.as_term();
            acc = Some(match acc {
                Some(prev) => prev.intersect(&own_term),
                None => own_term.clone(),
            });
            if acc.as_ref().unwrap().relation(term) == SetRelation::Subset {
                let difference = if own_term.relation(term) == SetRelation::Subset {
                    None
                } else {
                    Some(own_term.difference(term))
                };
                return (assignment, difference);
            }
        }
        unreachable!("incompatibility term without a satisfier in the partial solution")
    }

    /// Removes every assignment made at a decision level deeper than
    /// `level`, and drops back to it.
    pub fn backtrack(&mut self, level: u32) {
        let cut = self
            .assignments
            .iter()
            .position(|a| a.decision_level > level)
            .unwrap_or(self.assignments.len());
        if cut < self.assignments.len() {
            self.attempted_solutions += 1;
        }
        self.assignments.truncate(cut);
        self.decision_level = level;
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.by_package.clear();
        for idx in 0..self.assignments.len() {
            let term = self.assignments[idx].as_term();
            let key = self.assignments[idx].dependency.package_key();
            let decided_version = self.assignments[idx].decided_version.clone();
            let entry = self.entry(&key);
            entry.record(&term, idx);
            if decided_version.is_some() {
                entry.decision = decided_version;
            }
        }
    }

    /// All decided, non-root packages, in decision order.
    pub fn extract_solution(&self) -> Vec<DependencyPackage<C>> {
        self.assignments
            .iter()
            .filter(|a| !a.dependency.is_root)
            .filter_map(|a| a.decided_version.clone().map(|v| DependencyPackage::new(a.dependency.clone(), v)))
            .collect()
    }
}
