// SPDX-License-Identifier: MPL-2.0

//! A two-layer memoization cache in front of a [`Provider`](crate::provider::Provider)'s
//! `search_for`, grounded on the original Python solver's `DependencyCache`
//! (`original_source/src/poetry/mixology/version_solver.py`): a keyed cache
//! that narrows monotonically as the solver's constraints tighten, fronted
//! by a small bounded most-recently-used cache keyed on the exact
//! dependency requested.
//!
//! The teacher crate has no equivalent (its `OfflineDependencyProvider` is
//! itself the full data source, nothing to cache in front of); this module
//! instead borrows the teacher's general idiom of using `indexmap::IndexMap`
//! for ordered, fast-hashing maps and applies it to the bounded-MRU layer,
//! rather than adding a dedicated `lru` crate the teacher doesn't carry.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::constraint::Constraint;
use crate::dependency::Dependency;
use crate::package::DependencyPackage;
use crate::provider::Provider;
use crate::source::Source;

/// Most-recently-used entries to keep before evicting the oldest.
const MRU_CAPACITY: usize = 128;

/// Caches `search_for` results across the lifetime of one solve.
pub(crate) struct DependencyCache<C: Constraint> {
    /// Per-(name, source) results, replaced (not merged) whenever the
    /// solver's constraint narrows, mirroring `_get_locked`'s cache usage in
    /// the original: cleared on every successful backjump so a stale,
    /// over-permissive result never survives a backtrack.
    filtered: IndexMap<(String, Source), Vec<DependencyPackage<C>>, FxBuildHasher>,
    /// Bounded most-recently-used cache keyed on the exact dependency asked
    /// for, including its constraint — a cheap win when the same dependency
    /// is requested unchanged by multiple dependents in a row.
    mru: IndexMap<Dependency<C>, Vec<DependencyPackage<C>>, FxBuildHasher>,
}

impl<C: Constraint> DependencyCache<C> {
    pub fn new() -> Self {
        Self {
            filtered: IndexMap::default(),
            mru: IndexMap::default(),
        }
    }

    /// Looks up candidates for `dependency`, consulting the provider only on
    /// a cache miss.
    pub fn search_for<PR>(&mut self, dependency: &Dependency<C>, provider: &PR) -> Result<Vec<DependencyPackage<C>>, PR::M>
    where
        PR: Provider<C = C>,
    {
        if let Some(hit) = self.mru.shift_remove(dependency) {
            self.mru.insert(dependency.clone(), hit.clone());
            return Ok(hit);
        }

        let key = dependency.package_key();
        let result = match self.filtered.get(&key) {
            Some(cached) => cached
                .iter()
                .filter(|p| dependency.constraint.allows(&p.version))
                .cloned()
                .collect(),
            None => provider.search_for(dependency)?,
        };

        self.filtered.insert(key, result.clone());
        self.mru_insert(dependency.clone(), result.clone());
        Ok(result)
    }

    fn mru_insert(&mut self, dependency: Dependency<C>, result: Vec<DependencyPackage<C>>) {
        self.mru.insert(dependency, result);
        while self.mru.len() > MRU_CAPACITY {
            self.mru.shift_remove_index(0);
        }
    }

    /// Drops every cached result. Called after a successful backjump so a
    /// result filtered against a now-obsolete constraint cannot leak forward.
    pub fn clear(&mut self) {
        self.filtered.clear();
        self.mru.clear();
    }
}
