// SPDX-License-Identifier: MPL-2.0

//! Opaque sets of versions.
//!
//! Concretely, a constraint corresponds to any set of versions
//! representable as the intersection, union, and complement of whatever
//! building blocks an ecosystem's range syntax provides. The core never
//! interprets version strings or range syntax itself; it only ever asks a
//! [`Constraint`] to intersect, complement, or test membership.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::version::Version;

/// How one set of versions relates to another.
///
/// Two constraints, or a [`Term`](crate::term::Term) and the partial
/// solution's running summary for its package, are always related by
/// exactly one of these three cases.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SetRelation {
    /// `a` is a subset of `b`: whenever `a` holds, `b` is guaranteed to hold.
    Subset,
    /// `a` and `b` share no version: whenever `a` holds, `b` cannot.
    Disjoint,
    /// Neither of the above: some versions satisfy both, some satisfy
    /// neither, and/or some satisfy only one.
    Overlapping,
}

/// Trait describing an opaque set of versions, closed under intersection,
/// union, and complement.
pub trait Constraint: Debug + Display + Clone + Eq + Hash {
    /// Version type admitted by this constraint.
    type V: Version;

    /// The empty set, containing no version.
    fn empty() -> Self;

    /// The set containing every version.
    fn full() -> Self;

    /// The set containing exactly one version.
    fn singleton(v: Self::V) -> Self;

    /// The complement of this set.
    fn complement(&self) -> Self;

    /// The intersection of this set with another.
    fn intersection(&self, other: &Self) -> Self;

    /// Whether `version` is a member of this set.
    fn allows(&self, version: &Self::V) -> bool;

    /// The union of this set with another.
    ///
    /// Automatically derived from [`complement`](Constraint::complement) and
    /// [`intersection`](Constraint::intersection) via De Morgan's law, the
    /// same way [`version_set::VersionSet::union`] is in the teacher crate.
    fn union(&self, other: &Self) -> Self {
        self.complement().intersection(&other.complement()).complement()
    }
}

/// Whether `a` is a subset of `b`, disjoint from `b`, or neither.
///
/// Shared by [`Term::relation`](crate::term::Term::relation) (`a` and `b`
/// are two terms' sets) and by the partial solution's `relation` query (`a`
/// is the running summary for a package, `b` is a candidate term) — both
/// reduce to the same three-way set comparison.
pub(crate) fn subset_relation<C: Constraint>(a: &C, b: &C) -> SetRelation {
    let intersection = a.intersection(b);
    if &intersection == a {
        SetRelation::Subset
    } else if intersection == C::empty() {
        SetRelation::Disjoint
    } else {
        SetRelation::Overlapping
    }
}
