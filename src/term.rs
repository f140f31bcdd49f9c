// SPDX-License-Identifier: MPL-2.0

//! A term is the atomic unit an incompatibility and the partial solution
//! reason about: a dependency together with whether it is asserted
//! (positive) or ruled out (negative).
//!
//! Grounded on the usage patterns in `internal/core.rs` and
//! `internal/incompatibility.rs` of the teacher crate (its own `term.rs` is a
//! stale leftover from an older, incompatible `Range`/`Interval` design and
//! was not ported).

use std::fmt::{self, Display};

use crate::constraint::{subset_relation, Constraint, SetRelation};
use crate::dependency::Dependency;

/// A dependency asserted true (`is_positive`) or ruled out.
#[derive(Debug, Clone)]
pub struct Term<C: Constraint> {
    pub dependency: Dependency<C>,
    is_positive: bool,
}

impl<C: Constraint> Term<C> {
    pub fn new(dependency: Dependency<C>, is_positive: bool) -> Self {
        Self { dependency, is_positive }
    }

    pub fn positive(dependency: Dependency<C>) -> Self {
        Self::new(dependency, true)
    }

    pub fn negative(dependency: Dependency<C>) -> Self {
        Self::new(dependency, false)
    }

    pub fn is_positive(&self) -> bool {
        self.is_positive
    }

    /// Always-true term about `dependency`'s package: an excluded empty set.
    pub fn any(dependency: Dependency<C>) -> Self {
        let mut dependency = dependency;
        dependency.constraint = C::empty();
        Self::new(dependency, false)
    }

    /// Whether `self` and `other` constrain the same package: matching
    /// complete name and source, per the identity `Dependency` already uses.
    pub fn same_package(&self, other: &Term<C>) -> bool {
        self.dependency.complete_name() == other.dependency.complete_name()
            && self.dependency.source == other.dependency.source
    }

    /// The actual version set this term represents: the constraint itself
    /// when positive, its complement when negative.
    pub fn as_set(&self) -> C {
        if self.is_positive {
            self.dependency.constraint.clone()
        } else {
            self.dependency.constraint.complement()
        }
    }

    pub fn is_tautology(&self) -> bool {
        !self.is_positive && self.dependency.constraint == C::empty()
    }

    pub fn is_contradiction(&self) -> bool {
        self.is_positive && self.dependency.constraint == C::empty()
    }

    /// Negate polarity, leaving the underlying constraint untouched.
    pub fn inverse(&self) -> Self {
        Self::new(self.dependency.clone(), !self.is_positive)
    }

    /// Relation of `self`'s set to `other`'s set: `SUBSET` means `self`
    /// implies `other`, `DISJOINT` means they can never both hold,
    /// `OVERLAPPING` otherwise. Terms about different packages never
    /// constrain one another, so they are always `OVERLAPPING`.
    pub fn relation(&self, other: &Term<C>) -> SetRelation {
        if !self.same_package(other) {
            return SetRelation::Overlapping;
        }
        subset_relation(&self.as_set(), &other.as_set())
    }

    /// Whether `self` guarantees `other`.
    pub fn satisfies(&self, other: &Term<C>) -> bool {
        self.relation(other) == SetRelation::Subset
    }

    /// The strongest term implied by both `self` and `other` holding at
    /// once, following the standard four-case term-intersection rule:
    /// `(+,+) -> +(a∩b)`, `(+,-) -> +(a∩¬b)`, `(-,+) -> +(¬a∩b)`,
    /// `(-,-) -> -(a∪b)`. Assumes both terms are about the same package.
    pub fn intersect(&self, other: &Term<C>) -> Term<C> {
        debug_assert!(self.same_package(other));
        let a = &self.dependency.constraint;
        let b = &other.dependency.constraint;
        let (is_positive, set) = match (self.is_positive, other.is_positive) {
            (true, true) => (true, a.intersection(b)),
            (true, false) => (true, a.intersection(&b.complement())),
            (false, true) => (true, a.complement().intersection(b)),
            (false, false) => (false, a.union(b)),
        };
        let mut dependency = self.dependency.clone();
        dependency.constraint = set;
        Term::new(dependency, is_positive)
    }

    /// The term implied by `self` holding while `other` does not.
    pub fn difference(&self, other: &Term<C>) -> Term<C> {
        self.intersect(&other.inverse())
    }
}

impl<C: Constraint> Display for Term<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_positive {
            write!(f, "not ")?;
        }
        write!(f, "{}", self.dependency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Marker;
    use crate::range::Range;
    use crate::source::Source;
    use crate::version::SemanticVersion as V;

    fn dep(name: &str, range: Range<V>) -> Dependency<Range<V>> {
        Dependency::new(name, range, Source::registry(), Marker::any())
    }

    #[test]
    fn inverse_flips_polarity_only() {
        let t = Term::positive(dep("a", Range::higher_than(V::new(1, 0, 0))));
        let inv = t.inverse();
        assert!(!inv.is_positive());
        assert_eq!(inv.dependency.constraint, t.dependency.constraint);
    }

    #[test]
    fn positive_subset_of_wider_positive() {
        let narrow = Term::positive(dep("a", Range::singleton(V::new(1, 2, 3))));
        let wide = Term::positive(dep("a", Range::higher_than(V::new(1, 0, 0))));
        assert_eq!(narrow.relation(&wide), SetRelation::Subset);
    }

    #[test]
    fn disjoint_positive_terms() {
        let below = Term::positive(dep("a", Range::strictly_lower_than(V::new(1, 0, 0))));
        let above = Term::positive(dep("a", Range::higher_than(V::new(2, 0, 0))));
        assert_eq!(below.relation(&above), SetRelation::Disjoint);
    }

    #[test]
    fn different_packages_are_overlapping() {
        let a = Term::positive(dep("a", Range::full()));
        let b = Term::positive(dep("b", Range::full()));
        assert_eq!(a.relation(&b), SetRelation::Overlapping);
    }

    #[test]
    fn intersect_two_positives_is_their_intersection() {
        let a = Term::positive(dep("a", Range::higher_than(V::new(1, 0, 0))));
        let b = Term::positive(dep("a", Range::strictly_lower_than(V::new(2, 0, 0))));
        let merged = a.intersect(&b);
        assert!(merged.is_positive());
        assert!(merged.dependency.constraint.allows(&V::new(1, 5, 0)));
        assert!(!merged.dependency.constraint.allows(&V::new(2, 0, 0)));
    }

    #[test]
    fn any_term_is_tautology() {
        let t = Term::<Range<V>>::any(dep("a", Range::full()));
        assert!(t.is_tautology());
    }
}
