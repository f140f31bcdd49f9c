// SPDX-License-Identifier: MPL-2.0

//! An incompatibility is a set of terms that cannot all hold simultaneously.
//!
//! Identity and deduplication follow the teacher's current technique in
//! `internal/core.rs`: incompatibilities live in an [`Arena`] and are
//! referenced everywhere by [`Id`], rather than by an ad hoc `usize` and a
//! `Hash`/`Eq` bound on the whole struct (the older, now-stale
//! `incompatibility.rs` the teacher also carries used that approach; it was
//! not ported).

use std::fmt::{self, Debug, Display};

use crate::constraint::Constraint;
use crate::dependency::Dependency;
use crate::internal::arena::Id;
use crate::internal::small_vec::SmallVec;
use crate::package::DependencyPackage;
use crate::term::Term;

/// Why an incompatibility exists.
#[derive(Debug, Clone)]
pub enum Cause<C: Constraint, M> {
    /// The seed declaring that the root package must be selected.
    Root,
    /// A provider reported no versions satisfying a dependency.
    NoVersions,
    /// A provider failed to even look up a dependency's candidates.
    PackageNotFound(M),
    /// `depender` at the given version requires `dependency`.
    Dependency,
    /// Derived by resolving a conflict between two earlier incompatibilities.
    Conflict(Id<Incompatibility<C, M>>, Id<Incompatibility<C, M>>),
}

/// A set of terms that cannot all hold at once.
#[derive(Debug, Clone)]
pub struct Incompatibility<C: Constraint, M> {
    terms: SmallVec<Term<C>>,
    cause: Cause<C, M>,
}

impl<C: Constraint, M> Incompatibility<C, M> {
    /// Builds an incompatibility from raw terms, canonicalizing them: terms
    /// about the same package are folded together via
    /// [`Term::intersect`](Term::intersect) (positive with positive
    /// intersects, negative with negative unions, a mix reduces to whichever
    /// single term the combination implies), and any term that becomes a
    /// tautology after folding is dropped since it contributes nothing to
    /// the disjunction.
    pub fn new(terms: Vec<Term<C>>, cause: Cause<C, M>) -> Self {
        let mut folded: Vec<Term<C>> = Vec::with_capacity(terms.len());
        'terms: for term in terms {
            for existing in folded.iter_mut() {
                if existing.same_package(&term) {
                    *existing = existing.intersect(&term);
                    continue 'terms;
                }
            }
            folded.push(term);
        }
        folded.retain(|t| !t.is_tautology());

        let mut smallvec = SmallVec::empty();
        for t in folded {
            smallvec.push(t);
        }
        Self {
            terms: smallvec,
            cause,
        }
    }

    /// The root incompatibility: the root package must be selected. Encoded,
    /// as the original solver does, as a single negative term on the root
    /// dependency — `propagate` then derives the positive decision from it.
    pub fn not_root(root_dependency: Dependency<C>) -> Self {
        Self::new(vec![Term::negative(root_dependency)], Cause::Root)
    }

    /// No version of `dependency` satisfies the provider's search.
    pub fn no_versions(dependency: Dependency<C>) -> Self {
        Self::new(vec![Term::positive(dependency)], Cause::NoVersions)
    }

    /// The provider could not even search for `dependency`.
    pub fn package_not_found(dependency: Dependency<C>, err: M) -> Self {
        Self::new(vec![Term::positive(dependency)], Cause::PackageNotFound(err))
    }

    /// `depender` requires `dependency`.
    pub fn from_dependency(depender: &DependencyPackage<C>, dependency: Dependency<C>) -> Self {
        let depender_term = Term::positive(Dependency::new(
            depender.dependency.name.clone(),
            C::singleton(depender.version.clone()),
            depender.dependency.source.clone(),
            depender.dependency.marker.clone(),
        ));
        Self::new(vec![depender_term, Term::negative(dependency)], Cause::Dependency)
    }

    /// Derived from two conflicting incompatibilities during conflict
    /// resolution.
    pub fn derived(terms: Vec<Term<C>>, left: Id<Incompatibility<C, M>>, right: Id<Incompatibility<C, M>>) -> Self {
        Self::new(terms, Cause::Conflict(left, right))
    }

    pub fn terms(&self) -> &[Term<C>] {
        self.terms.as_slice()
    }

    pub fn cause(&self) -> &Cause<C, M> {
        &self.cause
    }

    /// The term this incompatibility carries for `complete_name`, if any.
    pub fn get(&self, complete_name: &str) -> Option<&Term<C>> {
        self.terms.iter().find(|t| t.dependency.complete_name() == complete_name)
    }

    /// An incompatibility is a terminal failure once it has been reduced, by
    /// repeated conflict resolution, down to having no terms left (an
    /// unconditional contradiction) or a single positive term on the root
    /// package (asserting the impossible: that root must both be and not be
    /// selected).
    pub fn is_failure(&self) -> bool {
        self.terms.is_empty()
            || (self.terms.len() == 1 && self.terms[0].is_positive() && self.terms[0].dependency.is_root)
    }
}

impl<C: Constraint, M: Display> Display for Incompatibility<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        if rendered.is_empty() {
            write!(f, "version solving failed")
        } else {
            write!(f, "{}", rendered.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Marker;
    use crate::package::DependencyPackage;
    use crate::range::Range;
    use crate::source::Source;
    use crate::version::SemanticVersion as V;

    fn dep(name: &str, range: Range<V>) -> Dependency<Range<V>> {
        Dependency::new(name, range, Source::registry(), Marker::any())
    }

    #[test]
    fn folding_merges_same_package_terms() {
        let a = Term::positive(dep("x", Range::higher_than(V::new(1, 0, 0))));
        let b = Term::positive(dep("x", Range::strictly_lower_than(V::new(2, 0, 0))));
        let incompat: Incompatibility<Range<V>, String> = Incompatibility::new(vec![a, b], Cause::NoVersions);
        assert_eq!(incompat.terms().len(), 1);
    }

    #[test]
    fn tautology_terms_are_dropped() {
        let any = Term::any(dep("x", Range::full()));
        let real = Term::positive(dep("y", Range::full()));
        let incompat: Incompatibility<Range<V>, String> =
            Incompatibility::new(vec![any, real], Cause::NoVersions);
        assert_eq!(incompat.terms().len(), 1);
        assert_eq!(incompat.terms()[0].dependency.name, "y");
    }

    #[test]
    fn not_root_is_not_itself_a_failure() {
        let root_dep = Dependency::root("root", Range::singleton(V::new(1, 0, 0)));
        let incompat: Incompatibility<Range<V>, String> = Incompatibility::not_root(root_dep);
        assert!(!incompat.is_failure());
    }

    #[test]
    fn empty_terms_is_a_failure() {
        let incompat: Incompatibility<Range<V>, String> = Incompatibility::new(vec![], Cause::NoVersions);
        assert!(incompat.is_failure());
    }

    #[test]
    fn from_dependency_pins_the_depender() {
        let depender = DependencyPackage::new(dep("a", Range::full()), V::new(1, 0, 0));
        let dependency = dep("b", Range::higher_than(V::new(2, 0, 0)));
        let incompat: Incompatibility<Range<V>, String> =
            Incompatibility::from_dependency(&depender, dependency);
        assert_eq!(incompat.terms().len(), 2);
        let a_term = incompat.get("a").unwrap();
        assert!(a_term.is_positive());
    }
}
