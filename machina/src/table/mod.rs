//! # Tuple-keyed tables
//! An associative container whose keys are fixed-arity tuples, used for
//! the LL(1) analysis table (keyed by variable and lookahead) and the PDA
//! transition table (keyed by state, input label and stack symbol). The
//! arity travels with the key type, so a query with a key of the wrong
//! arity is rejected by the compiler rather than at runtime.

use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

/// A fixed-arity composite key. Implemented for 2- and 3-tuples of
/// hashable components.
pub trait CompositeKey: Eq + Hash {
    const ARITY: usize;
}

impl<A: Eq + Hash, B: Eq + Hash> CompositeKey for (A, B) {
    const ARITY: usize = 2;
}

impl<A: Eq + Hash, B: Eq + Hash, C: Eq + Hash> CompositeKey for (A, B, C) {
    const ARITY: usize = 3;
}

/// A map from fixed-arity tuple keys to values. Entry enumeration has no
/// ordering guarantees.
#[derive(Debug, Clone)]
pub struct KeyedTable<K: CompositeKey, V> {
    entries: HashMap<K, V>,
}

impl<K: CompositeKey, V> KeyedTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The number of components in this table's keys
    pub fn arity(&self) -> usize {
        K::ARITY
    }

    /// Inserts a value, returning the previous value under the same key if
    /// there was one
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn entry(&mut self, key: K) -> hash_map::Entry<'_, K, V> {
        self.entries.entry(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }
}

impl<K: CompositeKey, V> Default for KeyedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
