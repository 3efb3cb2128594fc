//! Per-request suppression of repeated result rows
//!
//! Each search builds its results in a single loop and keeps one `Deduplicator`
//! for that loop only. Keys are plain structs with derived equality, so no field
//! value can collide with another through a shared separator.

use std::collections::HashSet;
use std::hash::Hash;

/// Set of keys seen while accumulating one response
#[derive(Debug)]
pub struct Deduplicator<K> {
    seen: HashSet<K>,
}

impl<K: Eq + Hash> Deduplicator<K> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record `key`; true only the first time it is offered
    ///
    /// Offering a key that was already seen changes nothing.
    pub fn first_sighting(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }
}

impl<K: Eq + Hash> Default for Deduplicator<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a forward search row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardKey {
    pub title: String,
    pub area_name: String,
    pub state: String,
    pub county_town: String,
}

/// Identity of a location search row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub title: String,
    pub state: String,
    pub county_town: String,
}
