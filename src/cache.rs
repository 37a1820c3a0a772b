// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Caller-owned cache for expensive-to-fetch values.
//!
//! There is no process-wide cache anywhere in this crate. Whoever needs one
//! owns a `ReferenceCache`, decides when entries go stale (`invalidate`,
//! `clear`), and can bypass a cached entry with `FetchPolicy::FetchFresh`.
//! Failed fetches are returned to the caller and never stored, so the next
//! call tries again.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// How `get_or_fetch` treats an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Use the cached value if present.
    #[default]
    PreferCached,
    /// Always fetch and overwrite the cached value.
    FetchFresh,
}

#[derive(Debug, Clone)]
pub struct ReferenceCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for ReferenceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> ReferenceCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value for `key`, calling `fetch` on a miss or when the
    /// policy is `FetchFresh`.
    ///
    /// If a fresh fetch fails, the previous entry (if any) is left in place.
    pub fn get_or_fetch<E>(
        &mut self,
        key: K,
        policy: FetchPolicy,
        fetch: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<&V, E> {
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                if policy == FetchPolicy::FetchFresh {
                    let fresh = fetch(slot.key())?;
                    slot.insert(fresh);
                }
                Ok(&*slot.into_mut())
            }
            Entry::Vacant(slot) => {
                let value = fetch(slot.key())?;
                Ok(&*slot.insert(value))
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Drop one entry. Returns it if it was cached.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
