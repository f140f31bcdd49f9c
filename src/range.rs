// SPDX-License-Identifier: MPL-2.0

//! [`Range`] is the concrete [`Constraint`] implementation the rest of this
//! crate is tested against: a set of versions expressed as a union of
//! disjoint, sorted intervals.
//!
//! Building blocks:
//!  - [empty()](Range::empty): the empty set
//!  - [full()](Range::full): the set of all possible versions
//!  - [singleton(v)](Range::singleton): the set containing only the version v
//!  - [higher_than(v)](Range::higher_than): the set defined by `v <= versions`
//!  - [strictly_higher_than(v)](Range::strictly_higher_than): the set defined by `v < versions`
//!  - [lower_than(v)](Range::lower_than): the set defined by `versions <= v`
//!  - [strictly_lower_than(v)](Range::strictly_lower_than): the set defined by `versions < v`
//!  - [between(v1, v2)](Range::between): the set defined by `v1 <= versions < v2`
//!
//! `intersection` sweeps both segment lists with a pair of cursors rather
//! than the iterator-pair style the rest of this module uses elsewhere;
//! the `Constraint` impl, `allows` naming, and the version bound are new.

use crate::constraint::Constraint;
use crate::internal::small_vec::SmallVec;
use crate::version::Version;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::Bound::{self, Excluded, Included, Unbounded};
use std::ops::RangeBounds;

/// A set of versions expressed as a union of disjoint, sorted intervals.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range<V> {
    segments: SmallVec<Interval<V>>,
}

type Interval<V> = (Bound<V>, Bound<V>);

impl<V: Version> Range<V> {
    /// Empty set of versions.
    pub fn empty() -> Self {
        Self {
            segments: SmallVec::empty(),
        }
    }

    /// Set of all possible versions.
    pub fn full() -> Self {
        Self {
            segments: SmallVec::one((Unbounded, Unbounded)),
        }
    }

    /// Set of all versions higher than or equal to `v`.
    pub fn higher_than(v: V) -> Self {
        Self {
            segments: SmallVec::one((Included(v), Unbounded)),
        }
    }

    /// Set of all versions strictly higher than `v`.
    pub fn strictly_higher_than(v: V) -> Self {
        Self {
            segments: SmallVec::one((Excluded(v), Unbounded)),
        }
    }

    /// Set of all versions strictly lower than `v`.
    pub fn strictly_lower_than(v: V) -> Self {
        Self {
            segments: SmallVec::one((Unbounded, Excluded(v))),
        }
    }

    /// Set of all versions lower than or equal to `v`.
    pub fn lower_than(v: V) -> Self {
        Self {
            segments: SmallVec::one((Unbounded, Included(v))),
        }
    }

    /// Set of versions greater than or equal to `v1` but less than `v2`.
    pub fn between(v1: V, v2: V) -> Self {
        Self {
            segments: SmallVec::one((Included(v1), Excluded(v2))),
        }
    }

    /// Set containing exactly one version.
    pub fn singleton(v: V) -> Self {
        Self {
            segments: SmallVec::one((Included(v.clone()), Included(v))),
        }
    }

    /// Set containing every version except `v`.
    pub fn not_equal(v: V) -> Self {
        Self {
            segments: SmallVec::Two([(Unbounded, Excluded(v.clone())), (Excluded(v), Unbounded)]),
        }
    }

    /// Returns the complement of this range.
    pub fn complement(&self) -> Self {
        match self.segments.first() {
            // Complement of ∅ is ∞.
            None => Self::full(),

            // Complement of ∞ is ∅.
            Some((Unbounded, Unbounded)) => Self::empty(),

            Some((Included(v), Unbounded)) => Self::strictly_lower_than(v.clone()),
            Some((Excluded(v), Unbounded)) => Self::lower_than(v.clone()),

            Some((Unbounded, Included(v))) => {
                Self::negate_segments(Excluded(v.clone()), &self.segments[1..])
            }
            Some((Unbounded, Excluded(v))) => {
                Self::negate_segments(Included(v.clone()), &self.segments[1..])
            }
            Some((Included(_), Included(_)))
            | Some((Included(_), Excluded(_)))
            | Some((Excluded(_), Included(_)))
            | Some((Excluded(_), Excluded(_))) => Self::negate_segments(Unbounded, &self.segments),
        }
    }

    fn negate_segments(start: Bound<V>, segments: &[Interval<V>]) -> Self {
        let mut complement_segments: SmallVec<Interval<V>> = SmallVec::empty();
        let mut start = start;
        for (v1, v2) in segments {
            complement_segments.push((
                start,
                match v1 {
                    Included(v) => Excluded(v.clone()),
                    Excluded(v) => Included(v.clone()),
                    Unbounded => unreachable!(),
                },
            ));
            start = match v2 {
                Included(v) => Excluded(v.clone()),
                Excluded(v) => Included(v.clone()),
                Unbounded => Unbounded,
            }
        }
        if !matches!(start, Unbounded) {
            complement_segments.push((start, Unbounded));
        }

        Self {
            segments: complement_segments,
        }
    }

    /// Convert to something usable with [`BTreeMap::range`](std::collections::BTreeMap::range).
    /// Every version in `self` is in the output, though the output may also
    /// contain versions not in `self`. Returns `None` if `self` is empty.
    pub fn bounding_range(&self) -> Option<(Bound<&V>, Bound<&V>)> {
        self.segments.first().map(|(start, _)| {
            let end = self
                .segments
                .last()
                .expect("if there is a first element, there must be a last element");
            (bound_as_ref(start), bound_as_ref(&end.1))
        })
    }

    /// Whether `v` is a member of this range.
    pub fn contains(&self, v: &V) -> bool {
        if let Some(bounding_range) = self.bounding_range() {
            if !bounding_range.contains(v) {
                return false;
            }
        }

        for segment in self.segments.iter() {
            if match segment {
                (Unbounded, Unbounded) => true,
                (Unbounded, Included(end)) => v <= end,
                (Unbounded, Excluded(end)) => v < end,
                (Included(start), Unbounded) => v >= start,
                (Included(start), Included(end)) => v >= start && v <= end,
                (Included(start), Excluded(end)) => v >= start && v < end,
                (Excluded(start), Unbounded) => v > start,
                (Excluded(start), Included(end)) => v > start && v <= end,
                (Excluded(start), Excluded(end)) => v > start && v < end,
            } {
                return true;
            }
        }
        false
    }

    /// Construct a simple range from anything implementing [`RangeBounds`], like `v1..v2`.
    pub fn from_range_bounds<R, IV>(bounds: R) -> Self
    where
        R: RangeBounds<IV>,
        IV: Clone + Into<V>,
    {
        let start = match bounds.start_bound() {
            Included(v) => Included(v.clone().into()),
            Excluded(v) => Excluded(v.clone().into()),
            Unbounded => Unbounded,
        };
        let end = match bounds.end_bound() {
            Included(v) => Included(v.clone().into()),
            Excluded(v) => Excluded(v.clone().into()),
            Unbounded => Unbounded,
        };
        match (start, end) {
            (Included(a), Included(b)) if b < a => Self::empty(),
            (Excluded(a), Excluded(b)) if b < a => Self::empty(),
            (Included(a), Excluded(b)) if b <= a => Self::empty(),
            (Excluded(a), Included(b)) if b <= a => Self::empty(),
            (a, b) => Self {
                segments: SmallVec::one((a, b)),
            },
        }
    }

    /// Computes the intersection of two ranges by sweeping both segment
    /// lists with a pair of cursors: at each step the two segments under
    /// the cursors either miss entirely (advance whichever ends first) or
    /// overlap, in which case their overlap becomes one output segment and
    /// whichever side's upper bound is the lower of the two (both, if tied)
    /// advances.
    pub fn intersection(&self, other: &Self) -> Self {
        let left = &self.segments;
        let right = &other.segments;
        let mut out: SmallVec<Interval<V>> = SmallVec::empty();
        let (mut i, mut j) = (0usize, 0usize);
        while i < left.len() && j < right.len() {
            let (lo_a, hi_a) = &left[i];
            let (lo_b, hi_b) = &right[j];

            if ends_before_starts(hi_a, lo_b) {
                i += 1;
                continue;
            }
            if ends_before_starts(hi_b, lo_a) {
                j += 1;
                continue;
            }

            let lo = tighter_lower(lo_a, lo_b);
            let (hi, take_a, take_b) = tighter_upper(hi_a, hi_b);
            out.push((lo, hi));
            if take_a {
                i += 1;
            }
            if take_b {
                j += 1;
            }
        }

        Self { segments: out }
    }
}

/// Whether the segment ending at `end` finishes strictly before the one
/// starting at `start` begins, i.e. the two cannot share a single point.
fn ends_before_starts<V: Version>(end: &Bound<V>, start: &Bound<V>) -> bool {
    match (end, start) {
        (Included(e) | Excluded(e), Included(s) | Excluded(s)) => match e.cmp(s) {
            Ordering::Less => true,
            Ordering::Equal => matches!(end, Excluded(_)) || matches!(start, Excluded(_)),
            Ordering::Greater => false,
        },
        _ => false,
    }
}

/// The more restrictive (higher) of two lower bounds.
fn tighter_lower<V: Version>(a: &Bound<V>, b: &Bound<V>) -> Bound<V> {
    match (a, b) {
        (Unbounded, _) => b.clone(),
        (_, Unbounded) => a.clone(),
        (Included(x) | Excluded(x), Included(y) | Excluded(y)) => match x.cmp(y) {
            Ordering::Greater => a.clone(),
            Ordering::Less => b.clone(),
            Ordering::Equal if matches!(a, Excluded(_)) || matches!(b, Excluded(_)) => Excluded(x.clone()),
            Ordering::Equal => Included(x.clone()),
        },
    }
}

/// The more restrictive (lower) of two upper bounds, plus which side(s)
/// that value came from so the caller knows which cursor to advance.
fn tighter_upper<V: Version>(a: &Bound<V>, b: &Bound<V>) -> (Bound<V>, bool, bool) {
    match (a, b) {
        (Unbounded, Unbounded) => (Unbounded, true, true),
        (Unbounded, _) => (b.clone(), false, true),
        (_, Unbounded) => (a.clone(), true, false),
        (Included(x) | Excluded(x), Included(y) | Excluded(y)) => match x.cmp(y) {
            Ordering::Less => (a.clone(), true, false),
            Ordering::Greater => (b.clone(), false, true),
            Ordering::Equal => {
                let bound = if matches!(a, Excluded(_)) || matches!(b, Excluded(_)) {
                    Excluded(x.clone())
                } else {
                    Included(x.clone())
                };
                (bound, true, true)
            }
        },
    }
}

fn bound_as_ref<V>(bound: &Bound<V>) -> Bound<&V> {
    match bound {
        Included(v) => Included(v),
        Excluded(v) => Excluded(v),
        Unbounded => Unbounded,
    }
}

impl<V: Version> Constraint for Range<V> {
    type V = V;

    fn empty() -> Self {
        Range::empty()
    }

    fn full() -> Self {
        Range::full()
    }

    fn singleton(v: Self::V) -> Self {
        Range::singleton(v)
    }

    fn complement(&self) -> Self {
        Range::complement(self)
    }

    fn intersection(&self, other: &Self) -> Self {
        Range::intersection(self, other)
    }

    fn allows(&self, version: &Self::V) -> bool {
        Range::contains(self, version)
    }
}

impl<V: Version> Display for Range<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "∅")?;
        } else {
            for (idx, segment) in self.segments.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                match segment {
                    (Unbounded, Unbounded) => write!(f, "*")?,
                    (Unbounded, Included(v)) => write!(f, "<={v}")?,
                    (Unbounded, Excluded(v)) => write!(f, "<{v}")?,
                    (Included(v), Unbounded) => write!(f, ">={v}")?,
                    (Included(v), Included(b)) => {
                        if v == b {
                            write!(f, "{v}")?
                        } else {
                            write!(f, ">={v},<={b}")?
                        }
                    }
                    (Included(v), Excluded(b)) => write!(f, ">={v}, <{b}")?,
                    (Excluded(v), Unbounded) => write!(f, ">{v}")?,
                    (Excluded(v), Included(b)) => write!(f, ">{v}, <={b}")?,
                    (Excluded(v), Excluded(b)) => write!(f, ">{v}, <{b}")?,
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SemanticVersion as V;
    use proptest::prelude::*;

    fn v(major: u32) -> V {
        V::new(major, 0, 0)
    }

    #[test]
    fn full_contains_everything() {
        assert!(Range::full().contains(&v(0)));
        assert!(Range::full().contains(&v(1000)));
    }

    #[test]
    fn empty_contains_nothing() {
        assert!(!Range::<V>::empty().contains(&v(0)));
    }

    #[test]
    fn complement_of_singleton_excludes_only_that_version() {
        let r = Range::singleton(v(2)).complement();
        assert!(!r.contains(&v(2)));
        assert!(r.contains(&v(1)));
        assert!(r.contains(&v(3)));
    }

    #[test]
    fn intersection_of_disjoint_ranges_is_empty() {
        let a = Range::strictly_lower_than(v(2));
        let b = Range::higher_than(v(5));
        assert_eq!(a.intersection(&b), Range::empty());
    }

    #[test]
    fn between_is_half_open() {
        let r = Range::between(v(1), v(3));
        assert!(r.contains(&v(1)));
        assert!(r.contains(&v(2)));
        assert!(!r.contains(&v(3)));
    }

    fn version_strategy() -> impl Strategy<Value = V> {
        (0u32..20).prop_map(v)
    }

    fn range_strategy() -> impl Strategy<Value = Range<V>> {
        prop::collection::vec(version_strategy(), 0..6).prop_map(|mut versions| {
            versions.sort();
            versions.dedup();
            let mut range = Range::empty();
            for chunk in versions.chunks(2) {
                range = range.union(&match chunk {
                    [a, b] => Range::between(a.clone(), b.clone()),
                    [a] => Range::higher_than(a.clone()),
                    _ => unreachable!(),
                });
            }
            range
        })
    }

    proptest! {
        #[test]
        fn complement_is_involutive(range in range_strategy()) {
            prop_assert_eq!(range.complement().complement(), range);
        }

        #[test]
        fn intersection_is_commutative(a in range_strategy(), b in range_strategy()) {
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn intersection_with_full_is_identity(range in range_strategy()) {
            prop_assert_eq!(range.intersection(&Range::full()), range);
        }

        #[test]
        fn version_in_range_iff_not_in_complement(range in range_strategy(), version in version_strategy()) {
            prop_assert_eq!(range.contains(&version), !range.complement().contains(&version));
        }
    }
}
