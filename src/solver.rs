// SPDX-License-Identifier: MPL-2.0

//! The conflict-driven clause-learning version solver.
//!
//! Finds a set of package versions that satisfies every dependency
//! constraint starting from a root project, learning a new incompatibility
//! from every conflict it hits so the same mistake is never repeated twice.
//!
//! The control flow is the teacher's (`internal/core.rs`'s `State::unit_propagation`
//! / `conflict_resolution` shape, an `Arena`-backed incompatibility store, a
//! worklist-driven propagation loop) applied to the literal algorithm in
//! `original_source/src/poetry/mixology/version_solver.py`, which this port
//! follows wherever the two diverge (see DESIGN.md for the one deliberate
//! departure: the root incompatibility is seeded as a negative term on the
//! root dependency, matching the Python original, not the positive-term
//! phrasing in spec.md's prose, which does not propagate correctly).

use std::time::Instant;

use rustc_hash::{FxHashMap as Map, FxHashSet as Set};

use crate::cache::DependencyCache;
use crate::constraint::{Constraint, SetRelation};
use crate::dependency::Dependency;
use crate::error::{ResolveError, SolveFailure};
use crate::internal::arena::{Arena, Id};
use crate::internal::incompatibility::Incompatibility;
use crate::internal::partial_solution::PartialSolution;
use crate::package::{DependencyPackage, ProjectPackage};
use crate::provider::Provider;
use crate::version::Version;
use crate::result::SolverResult;
use crate::source::Source;
use crate::term::Term;

type PackageKey = (String, Source);

/// Drives one resolution from a root package against a [`Provider`].
pub struct VersionSolver<'p, PR: Provider> {
    provider: &'p PR,
    root: ProjectPackage<PR::C>,
    locked: Map<String, DependencyPackage<PR::C>>,
    use_latest: Set<String>,
    store: Arena<Incompatibility<PR::C, PR::M>>,
    incompatibilities: Map<PackageKey, Vec<Id<Incompatibility<PR::C, PR::M>>>>,
    /// Incompatibilities known to already be contradicted, and the decision
    /// level at which that was observed; invalidated by any backtrack to a
    /// shallower level so unit propagation never re-derives a stale fact.
    contradicted: Map<Id<Incompatibility<PR::C, PR::M>>, u32>,
    solution: PartialSolution<PR::C, PR::M>,
    cache: DependencyCache<PR::C>,
}

impl<'p, PR: Provider> VersionSolver<'p, PR> {
    pub fn new(
        provider: &'p PR,
        root: ProjectPackage<PR::C>,
        locked: Vec<DependencyPackage<PR::C>>,
        use_latest: Vec<String>,
    ) -> Self {
        Self {
            provider,
            root,
            locked: locked.into_iter().map(|p| (p.dependency.name.clone(), p)).collect(),
            use_latest: use_latest.into_iter().collect(),
            store: Arena::new(),
            incompatibilities: Map::default(),
            contradicted: Map::default(),
            solution: PartialSolution::empty(),
            cache: DependencyCache::new(),
        }
    }

    /// Runs the solver to completion.
    pub fn solve(mut self) -> Result<SolverResult<PR::C>, ResolveError<PR>> {
        let start = Instant::now();
        let root_dependency = self.root.root_dependency();
        let root_package = DependencyPackage::new(root_dependency.clone(), self.root.version.clone());
        let root_key = root_dependency.package_key();
        self.add_incompatibility(Incompatibility::not_root(root_dependency));

        // Root's own dependencies are known upfront — it has no candidates
        // to search for, so it never goes through `choose_package_version`.
        // Its incompatibilities are seeded once, here, the same way any
        // other package's are seeded once it is chosen.
        let complete_root = self
            .provider
            .complete_package(&root_package)
            .map_err(ResolveError::Provider)?;
        let root_extra_incompats = self
            .provider
            .incompatibilities_for(&complete_root)
            .map_err(ResolveError::Provider)?;
        for dep in complete_root.dependencies {
            self.add_incompatibility(Incompatibility::from_dependency(&root_package, dep));
        }
        for incompat in root_extra_incompats {
            self.add_incompatibility(incompat);
        }

        let mut next = Some(root_key);
        let outcome = loop {
            let Some(seed) = next else { break Ok(()) };
            log::info!("propagate: {}.{}", seed.0, seed.1);
            if let Err(terminal) = self.propagate(seed) {
                break Err(terminal);
            }
            match self.choose_package_version() {
                Ok(n) => next = n,
                Err(err) => {
                    self.log_finish(start);
                    return Err(ResolveError::Provider(err));
                }
            }
        };

        self.log_finish(start);
        match outcome {
            Ok(()) => {
                let packages = self.solution.extract_solution();
                let attempted_solutions = self.solution.attempted_solutions();
                Ok(SolverResult {
                    root: self.root,
                    packages,
                    attempted_solutions,
                })
            }
            Err(terminal) => {
                let attempted_solutions = self.solution.attempted_solutions();
                Err(ResolveError::NoSolution(SolveFailure {
                    terminal,
                    store: self.store,
                    attempted_solutions,
                }))
            }
        }
    }

    fn log_finish(&self, start: Instant) {
        self.provider.debug(
            &format!(
                "Version solving took {:.3} seconds.\nTried {} solutions.",
                start.elapsed().as_secs_f64(),
                self.solution.attempted_solutions()
            ),
            self.solution.attempted_solutions(),
        );
    }

    fn add_incompatibility(&mut self, incompat: Incompatibility<PR::C, PR::M>) -> Id<Incompatibility<PR::C, PR::M>> {
        self.provider.debug(&format!("fact: {incompat}"), self.solution.attempted_solutions());
        let keys: Vec<PackageKey> = incompat.terms().iter().map(|t| t.dependency.package_key()).collect();
        let id = self.store.alloc(incompat);
        for key in keys {
            self.incompatibilities.entry(key).or_default().push(id);
        }
        id
    }

    /// Unit propagation: repeatedly re-checks every incompatibility that
    /// mentions a package whose knowledge just changed, deriving new facts
    /// or resolving conflicts, until nothing changes anymore.
    fn propagate(&mut self, seed: PackageKey) -> Result<(), Id<Incompatibility<PR::C, PR::M>>> {
        let mut changed = vec![seed];
        while let Some(package) = changed.pop() {
            let ids = self.incompatibilities.get(&package).cloned().unwrap_or_default();
            for &id in ids.iter().rev() {
                if self.contradicted.contains_key(&id) {
                    continue;
                }
                if let Some(next) = self.propagate_incompatibility(id)? {
                    changed.push(next);
                }
            }
        }
        Ok(())
    }

    /// Checks one incompatibility against the current partial solution.
    ///
    /// Returns the key of a package whose knowledge changed — either because
    /// a new fact was derived, or because conflict resolution backjumped and
    /// derived the root cause's surviving term — so the caller can keep it
    /// on the propagation worklist. `Err` signals the solve is unsatisfiable.
    fn propagate_incompatibility(
        &mut self,
        id: Id<Incompatibility<PR::C, PR::M>>,
    ) -> Result<Option<PackageKey>, Id<Incompatibility<PR::C, PR::M>>> {
        let terms = self.store[id].terms().to_vec();
        let mut unsatisfied: Option<Term<PR::C>> = None;
        for term in &terms {
            match self.solution.relation(term) {
                SetRelation::Disjoint => {
                    self.contradicted.insert(id, self.solution.current_decision_level());
                    return Ok(None);
                }
                SetRelation::Subset => {}
                SetRelation::Overlapping => {
                    if unsatisfied.is_some() {
                        return Ok(None);
                    }
                    unsatisfied = Some(term.clone());
                }
            }
        }

        match unsatisfied {
            None => {
                self.provider
                    .debug(&format!("conflict: {}", self.store[id]), self.solution.attempted_solutions());
                self.resolve_conflict(id).map(Some)
            }
            Some(term) => {
                let dependency = term.dependency.clone();
                let key = dependency.package_key();
                let is_positive = !term.is_positive();
                self.provider.debug(
                    &format!("derived: {}", Term::new(dependency.clone(), is_positive)),
                    self.solution.attempted_solutions(),
                );
                self.solution.derive(dependency, is_positive, id);
                Ok(Some(key))
            }
        }
    }

    /// Non-chronological backjumping: walks the chain of incompatibilities
    /// that produced `incompat_id` until it finds the decision level where
    /// the conflict first became inevitable, unwinds to it, and derives the
    /// root cause's surviving term there.
    fn resolve_conflict(
        &mut self,
        mut incompat_id: Id<Incompatibility<PR::C, PR::M>>,
    ) -> Result<PackageKey, Id<Incompatibility<PR::C, PR::M>>> {
        loop {
            if self.store[incompat_id].is_failure() {
                return Err(incompat_id);
            }

            let terms = self.store[incompat_id].terms().to_vec();

            let mut most_recent_term: Option<Term<PR::C>> = None;
            let mut most_recent_satisfier_index: i64 = -1;
            let mut most_recent_satisfier_level: u32 = 0;
            let mut most_recent_satisfier_is_decision = false;
            let mut most_recent_satisfier_cause: Option<Id<Incompatibility<PR::C, PR::M>>> = None;
            let mut most_recent_difference: Option<Term<PR::C>> = None;
            // Never below 1: level 0 holds only facts true before any
            // decision was made, so there is nothing shallower to backjump
            // past.
            let mut previous_satisfier_level: u32 = 1;

            for term in &terms {
                let (satisfier, difference) = self.solution.satisfier(term);
                let (sat_index, sat_level, sat_is_decision, sat_cause) =
                    (satisfier.index, satisfier.decision_level, satisfier.is_decision(), satisfier.cause);

                if most_recent_term.is_none() || i64::from(sat_index) > most_recent_satisfier_index {
                    if most_recent_term.is_some() {
                        previous_satisfier_level = previous_satisfier_level.max(most_recent_satisfier_level);
                    }
                    most_recent_term = Some(term.clone());
                    most_recent_satisfier_index = i64::from(sat_index);
                    most_recent_satisfier_level = sat_level;
                    most_recent_satisfier_is_decision = sat_is_decision;
                    most_recent_satisfier_cause = sat_cause;
                    most_recent_difference = difference;
                } else {
                    previous_satisfier_level = previous_satisfier_level.max(sat_level);
                }
            }

            let most_recent_term = most_recent_term.expect("a non-empty incompatibility has a most recent term");

            // A residual assertion beyond what `most_recent_term` needed is
            // itself a fact with its own provenance; the learned clause is
            // only sound as far back as where that fact, too, was established.
            if let Some(difference) = &most_recent_difference {
                let (difference_satisfier, _) = self.solution.satisfier(&difference.inverse());
                previous_satisfier_level = previous_satisfier_level.max(difference_satisfier.decision_level);
            }

            if most_recent_satisfier_is_decision || previous_satisfier_level < most_recent_satisfier_level {
                self.provider.debug(
                    &format!("backtrack to decision level {previous_satisfier_level}"),
                    self.solution.attempted_solutions(),
                );
                self.solution.backtrack(previous_satisfier_level);
                self.contradicted.retain(|_, level| *level <= previous_satisfier_level);
                self.cache.clear();
                let key = most_recent_term.dependency.package_key();
                self.solution
                    .derive(most_recent_term.dependency.clone(), !most_recent_term.is_positive(), incompat_id);
                return Ok(key);
            }

            let cause_id = most_recent_satisfier_cause.expect("a non-decision satisfier always has a cause");

            let mut new_terms: Vec<Term<PR::C>> = terms
                .iter()
                .filter(|t| !t.same_package(&most_recent_term))
                .cloned()
                .collect();
            for t in self.store[cause_id].terms() {
                if !t.same_package(&most_recent_term) {
                    new_terms.push(t.clone());
                }
            }
            if let Some(difference) = most_recent_difference {
                new_terms.push(difference.inverse());
            }

            self.provider.debug(
                &format!("conflict: {} and {}", self.store[incompat_id], self.store[cause_id]),
                self.solution.attempted_solutions(),
            );
            let derived = Incompatibility::derived(new_terms, incompat_id, cause_id);
            incompat_id = self.add_incompatibility(derived);
        }
    }

    /// Decision-making: among dependencies still needing a decision, picks
    /// the one minimizing (marker specificity, remaining candidate count)
    /// (so doomed branches fail fast), narrows it to one version honoring
    /// `locked`/`use_latest`, expands it into its own dependencies, and
    /// either commits to it or — on a self-conflict — leaves it undecided
    /// for the next pass to retry with a different candidate.
    fn choose_package_version(&mut self) -> Result<Option<PackageKey>, PR::Err> {
        let unsatisfied = self.solution.unsatisfied();
        if unsatisfied.is_empty() {
            return Ok(None);
        }

        // Minimize (marker_is_specific, candidate_count): a marker-gated
        // dependency is deferred behind one that applies unconditionally,
        // and among those of equal specificity the fewest remaining
        // candidates goes first, since that is the one most likely to
        // drive a conflict cheaply. A dependency the caller has already
        // pinned down (locked, `use_latest`, or a pinned source) has no
        // real choice to explore, so it is forced to count 1 rather than
        // its raw candidate count.
        let mut best: Option<((bool, usize), Dependency<PR::C>)> = None;
        for dependency in unsatisfied {
            let is_pinned_down = self.use_latest.contains(&dependency.name)
                || self.locked.contains_key(&dependency.name)
                || dependency.source.is_pinned();
            let count = if is_pinned_down {
                1
            } else {
                match self.cache.search_for(&dependency, self.provider) {
                    Ok(candidates) => candidates.iter().filter(|p| dependency.constraint.allows(&p.version)).count(),
                    Err(_) => 0,
                }
            };
            let key = (!dependency.marker.is_any(), count);
            if best.as_ref().map_or(true, |(k, _)| key < *k) {
                best = Some((key, dependency));
            }
        }
        let (_, dependency) = best.expect("unsatisfied is non-empty");
        let key = dependency.package_key();

        let candidates = match self.cache.search_for(&dependency, self.provider) {
            Ok(candidates) => candidates,
            Err(err) => {
                self.add_incompatibility(Incompatibility::package_not_found(dependency, err));
                return Ok(Some(key));
            }
        };

        let Some(chosen) = self.pick_candidate(&dependency, &candidates) else {
            self.add_incompatibility(Incompatibility::no_versions(dependency));
            return Ok(Some(key));
        };

        self.provider.debug(
            &format!("selecting: {} {}", chosen.complete_name(), chosen.version),
            self.solution.attempted_solutions(),
        );

        let complete = self.provider.complete_package(&chosen)?;
        let extra_incompats = self.provider.incompatibilities_for(&complete)?;
        let mut new_ids = Vec::new();
        for dep in complete.dependencies {
            new_ids.push(self.add_incompatibility(Incompatibility::from_dependency(&chosen, dep)));
        }
        for incompat in extra_incompats {
            new_ids.push(self.add_incompatibility(incompat));
        }

        // Self-conflict: if any incompatibility this candidate just brought
        // in is already fully satisfied by facts about *other* packages,
        // deciding it now would immediately contradict the solution. Leave
        // it undecided — propagation derives the exclusion below, and the
        // next round tries a different candidate.
        let chosen_key = chosen.dependency.package_key();
        let self_conflict = new_ids.iter().any(|&id| {
            self.store[id]
                .terms()
                .iter()
                .filter(|t| t.dependency.package_key() != chosen_key)
                .all(|t| self.solution.relation(t) == SetRelation::Subset)
        });
        if !self_conflict {
            self.solution.decide(&chosen);
        }
        Ok(Some(key))
    }

    fn pick_candidate(
        &self,
        dependency: &Dependency<PR::C>,
        candidates: &[DependencyPackage<PR::C>],
    ) -> Option<DependencyPackage<PR::C>> {
        let allowed: Vec<&DependencyPackage<PR::C>> =
            candidates.iter().filter(|c| dependency.constraint.allows(&c.version)).collect();
        if allowed.is_empty() {
            return None;
        }

        if !self.use_latest.contains(&dependency.name) {
            if let Some(locked) = self.locked.get(&dependency.name) {
                let satisfies_locked = dependency.constraint.allows(&locked.version)
                    || (locked.version.is_prerelease() && dependency.constraint.allows(&locked.version.next_patch()));
                if satisfies_locked {
                    if let Some(candidate) = allowed.iter().find(|c| c.version == locked.version) {
                        return Some((*candidate).clone());
                    }
                }
            }
        }

        allowed.into_iter().max_by(|a, b| a.version.cmp(&b.version)).cloned()
    }
}
