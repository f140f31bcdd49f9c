// SPDX-License-Identifier: MPL-2.0

//! End-to-end resolutions against [`StubProvider`], one per documented
//! scenario: a trivial resolve, a conflict that needs non-chronological
//! backjumping, a clean failure, locked-version preference (with and
//! without an override), and extras-insensitive lock matching.

mod common;

use version_solver::{Provider, ProjectPackage, Range, ResolveError, SemanticVersion as V, VersionSolver};

use common::{caret, dep, dep_extra, exact, locked, StubProvider};

fn version_of<'a>(packages: &'a [version_solver::DependencyPackage<Range<V>>], name: &str) -> Option<&'a V> {
    packages.iter().find(|p| p.dependency.name == name).map(|p| &p.version)
}

#[test]
fn trivial_resolve_picks_the_only_candidate() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("foo", caret(1))]);
    provider.add("foo", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let result = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve().unwrap();

    assert_eq!(result.packages.len(), 1);
    assert_eq!(version_of(&result.packages, "foo"), Some(&V::new(1, 0, 0)));
}

/// Grounded on spec.md §8 scenario 2: resolving a conflict discovered only
/// after a decision requires backtracking past it, not just skipping a
/// self-conflicting candidate before deciding.
#[test]
fn conflict_discovered_after_a_decision_backjumps_to_retry_it() {
    let mut provider = StubProvider::new();
    provider.add(
        "root",
        (1, 0, 0),
        vec![dep("x", Range::full()), dep("p", Range::full()), dep("q", Range::full())],
    );
    provider.add("x", (1, 0, 0), vec![]);
    provider.add("p", (2, 0, 0), vec![dep("r", exact(2, 0, 0))]);
    provider.add("p", (1, 0, 0), vec![]);
    provider.add("q", (2, 0, 0), vec![]);
    provider.add("q", (1, 0, 0), vec![dep("r", exact(1, 0, 0))]);
    provider.add("r", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let result = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve().unwrap();

    assert_eq!(result.packages.len(), 3);
    assert_eq!(version_of(&result.packages, "x"), Some(&V::new(1, 0, 0)));
    assert_eq!(version_of(&result.packages, "p"), Some(&V::new(1, 0, 0)));
    assert_eq!(version_of(&result.packages, "q"), Some(&V::new(2, 0, 0)));
    assert!(
        result.attempted_solutions >= 2,
        "expected at least one backtrack, got {}",
        result.attempted_solutions
    );
}

/// Grounded on spec.md §8 scenario 3: an unsatisfiable constraint (no
/// candidate can ever satisfy both dependents at once) ends in `NoSolution`.
#[test]
fn unsatisfiable_shared_dependency_fails_cleanly() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("foo", caret(2)), dep("bar", caret(1))]);
    provider.add("foo", (2, 0, 0), vec![dep("shared", Range::strictly_lower_than(V::new(1, 0, 0)))]);
    provider.add("bar", (1, 0, 0), vec![dep("shared", Range::higher_than(V::new(1, 0, 0)))]);
    provider.add("shared", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let result = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve();

    assert!(matches!(result, Err(ResolveError::NoSolution(_))));
}

#[test]
fn locked_version_is_preferred_over_the_newest() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("foo", Range::full())]);
    provider.add("foo", (2, 0, 0), vec![]);
    provider.add("foo", (1, 1, 0), vec![]);
    provider.add("foo", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let locked_packages = vec![locked("foo", (1, 1, 0))];
    let result = VersionSolver::new(&provider, root, locked_packages, Vec::new()).solve().unwrap();

    assert_eq!(version_of(&result.packages, "foo"), Some(&V::new(1, 1, 0)));
}

#[test]
fn use_latest_overrides_the_locked_version() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("foo", Range::full())]);
    provider.add("foo", (2, 0, 0), vec![]);
    provider.add("foo", (1, 1, 0), vec![]);
    provider.add("foo", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let locked_packages = vec![locked("foo", (1, 1, 0))];
    let result = VersionSolver::new(&provider, root, locked_packages, vec!["foo".to_string()])
        .solve()
        .unwrap();

    assert_eq!(version_of(&result.packages, "foo"), Some(&V::new(2, 0, 0)));
}

/// Grounded on spec.md §8 scenario 5: a lock recorded against the bare
/// package name still applies to a request for it with extras attached.
#[test]
fn locked_match_ignores_extras() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep_extra("pkg", "extra", caret(1))]);
    provider.add("pkg", (1, 2, 0), vec![]);
    provider.add("pkg", (1, 1, 0), vec![]);
    provider.add("pkg", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let locked_packages = vec![locked("pkg", (1, 1, 0))];
    let result = VersionSolver::new(&provider, root, locked_packages, Vec::new()).solve().unwrap();

    assert_eq!(result.packages.len(), 1);
    assert_eq!(result.packages[0].dependency.complete_name(), "pkg[extra]");
    assert_eq!(result.packages[0].version, V::new(1, 1, 0));
}

/// Grounded on SPEC_FULL.md §C.3 / spec.md §4.5 step 4: when a freshly
/// chosen candidate's own dependency is already contradicted by facts known
/// about an unrelated package, the solver must leave it undecided rather
/// than deciding and immediately conflicting — the next propagation pass
/// excludes that candidate and a later choice retries with another.
#[test]
fn self_conflict_skips_decision_and_retries_a_different_candidate() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("q", Range::full()), dep("p", Range::full())]);
    provider.add("q", (1, 0, 0), vec![dep("r", exact(1, 0, 0))]);
    provider.add("p", (2, 0, 0), vec![dep("r", exact(2, 0, 0))]);
    provider.add("p", (1, 0, 0), vec![]);
    provider.add("r", (1, 0, 0), vec![]);

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let result = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve().unwrap();

    assert_eq!(version_of(&result.packages, "q"), Some(&V::new(1, 0, 0)));
    assert_eq!(version_of(&result.packages, "r"), Some(&V::new(1, 0, 0)));
    assert_eq!(version_of(&result.packages, "p"), Some(&V::new(1, 0, 0)));
    assert_eq!(
        result.attempted_solutions, 1,
        "a self-conflict skip never backtracks, so no extra attempt is counted"
    );
}

#[test]
fn provider_lookup_failure_becomes_a_package_not_found_incompatibility() {
    let mut provider = StubProvider::new();
    provider.add("root", (1, 0, 0), vec![dep("missing", Range::full())]);
    provider.fail_lookup("missing");

    let root = ProjectPackage::new("root", V::new(1, 0, 0));
    let result = VersionSolver::new(&provider, root, Vec::new(), Vec::new()).solve();

    assert!(matches!(result, Err(ResolveError::NoSolution(_))));
}
